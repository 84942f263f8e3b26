//! `guest` table: one row per confirmed attendee.
use std::cmp::Ordering;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_key: String,
    pub confirmed_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Lookup key for a name: trimmed and lowercased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Alphabetical key for listings: lookup key with accents stripped, so "Álvaro" sorts beside "Alvaro".
pub fn sort_key(name: &str) -> String {
    name_key(name).nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Listing order for every backing: folded key, then lookup key, then exact name.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    sort_key(a)
        .cmp(&sort_key(b))
        .then_with(|| name_key(a).cmp(&name_key(b)))
        .then_with(|| a.cmp(b))
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let name = name.trim();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        name_key: Set(name_key(name)),
        confirmed_at: Set(Utc::now().into()),
        updated_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

/// Oldest row whose key matches `name` case-insensitively.
pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::NameKey.eq(name_key(name)))
        .order_by_asc(Column::ConfirmedAt)
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

/// Every row in [`compare_names`] order. Sorted here rather than by the
/// database so the result does not depend on the server collation.
pub async fn list_ordered<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    let mut rows = Entity::find().all(db).await?;
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    Ok(rows)
}

pub async fn rename<C: ConnectionTrait>(db: &C, name: &str, new_name: &str) -> Result<Option<Model>, errors::ModelError> {
    validate_name(new_name)?;
    let Some(found) = find_by_name(db, name).await? else { return Ok(None) };
    let mut am: ActiveModel = found.into();
    am.name = Set(new_name.trim().to_string());
    am.name_key = Set(name_key(new_name));
    am.updated_at = Set(Some(Utc::now().into()));
    let updated = am.update(db).await?;
    Ok(Some(updated))
}

pub async fn delete_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    let Some(found) = find_by_name(db, name).await? else { return Ok(None) };
    Entity::delete_by_id(found.id).exec(db).await?;
    Ok(Some(found))
}

/// Remove every row; returns how many were deleted.
pub async fn clear<C: ConnectionTrait>(db: &C) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}
