use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{Guest, ManageAction, ManageOutcome, ManageRequest};
use super::repository::GuestRepository;
use crate::errors::ServiceError;

pub const NAME_REQUIRED: &str = "Nome é obrigatório";
pub const NEW_NAME_REQUIRED: &str = "Novo nome é obrigatório";

/// RSVP business service independent of web framework and storage backing.
pub struct GuestService<R: GuestRepository + ?Sized> {
    repo: Arc<R>,
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ServiceError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(message.into())),
    }
}

impl<R: GuestRepository + ?Sized> GuestService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Label of the active backing.
    pub fn backend(&self) -> &'static str { self.repo.backend() }

    /// Record a guest's confirmation.
    ///
    /// # Examples
    /// ```
    /// use service::guest::{GuestService, repository::mock::MockGuestRepository};
    /// use std::sync::Arc;
    /// let svc = GuestService::new(Arc::new(MockGuestRepository::default()));
    /// let guest = tokio_test::block_on(svc.confirm(Some("  Ana "))).unwrap();
    /// assert_eq!(guest.name, "Ana");
    /// assert!(tokio_test::block_on(svc.confirm(Some("ANA"))).is_err());
    /// ```
    #[instrument(skip(self))]
    pub async fn confirm(&self, name: Option<&str>) -> Result<Guest, ServiceError> {
        let name = required(name, NAME_REQUIRED)?;
        if let Some(existing) = self.repo.find_by_name_ci(name).await? {
            debug!(existing = %existing.name, "guest already confirmed");
            return Err(ServiceError::Conflict(existing.name));
        }
        let guest = self.repo.insert(name).await?;
        info!(guest = %guest.name, "presence_confirmed");
        Ok(guest)
    }

    /// All guests, ordered by name.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Guest>, ServiceError> {
        self.repo.list_all().await
    }

    /// Run one admin maintenance action.
    ///
    /// Unknown or missing actions leave the store untouched and yield
    /// [`ManageOutcome::Unrecognized`].
    #[instrument(skip(self, req), fields(action = ?req.action, name = ?req.name, new_name = ?req.new_name))]
    pub async fn manage(&self, req: ManageRequest) -> Result<ManageOutcome, ServiceError> {
        let Some(action) = req.action.as_deref().and_then(ManageAction::parse) else {
            warn!("unrecognized admin action");
            return Ok(ManageOutcome::Unrecognized);
        };

        match action {
            ManageAction::Delete => {
                let name = required(req.name.as_deref(), NAME_REQUIRED)?;
                match self.repo.delete_by_name(name).await? {
                    Some(removed) => {
                        info!(guest = %removed.name, "guest_removed");
                        Ok(ManageOutcome::Removed(removed))
                    }
                    None => Ok(ManageOutcome::NotFound),
                }
            }
            ManageAction::Edit => {
                let name = required(req.name.as_deref(), NAME_REQUIRED)?;
                let new_name = required(req.new_name.as_deref(), NEW_NAME_REQUIRED)?;
                // The new name is not checked against existing guests.
                match self.repo.update_name(name, new_name).await? {
                    Some(guest) => {
                        info!(from = %name, to = %guest.name, "guest_renamed");
                        // Echo the name as the caller sent it.
                        let previous = req.name.clone().unwrap_or_default();
                        Ok(ManageOutcome::Updated { previous, guest })
                    }
                    None => Ok(ManageOutcome::NotFound),
                }
            }
            ManageAction::Clear => {
                self.repo.clear_all().await?;
                info!("guest_list_cleared");
                Ok(ManageOutcome::Cleared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::repository::mock::MockGuestRepository;

    fn setup() -> (Arc<MockGuestRepository>, GuestService<MockGuestRepository>) {
        let repo = Arc::new(MockGuestRepository::default());
        (repo.clone(), GuestService::new(repo))
    }

    fn manage(action: &str, name: Option<&str>, new_name: Option<&str>) -> ManageRequest {
        ManageRequest {
            action: Some(action.into()),
            name: name.map(Into::into),
            new_name: new_name.map(Into::into),
        }
    }

    #[tokio::test]
    async fn confirm_twice_any_casing_conflicts() {
        let (repo, svc) = setup();
        for (first, second) in [("Ana", "ana"), ("JOÃO", "joão"), ("Bia Souza", "  bia souza ")] {
            assert!(svc.confirm(Some(first)).await.is_ok());
            let err = svc.confirm(Some(second)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Conflict(_)));
        }
        assert_eq!(repo.len(), 3);
        let list = svc.list().await.unwrap();
        assert_eq!(list.iter().filter(|g| g.name == "Ana").count(), 1);
    }

    #[tokio::test]
    async fn blank_names_are_rejected_without_storing() {
        let (repo, svc) = setup();
        for name in [None, Some(""), Some("   "), Some("\t\n")] {
            let err = svc.confirm(name).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref m) if m == NAME_REQUIRED));
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn list_is_sorted_and_never_fails_when_empty() {
        let (_, svc) = setup();
        assert!(svc.list().await.unwrap().is_empty());
        for n in ["Rui", "ana", "Marcos", "beatriz"] {
            svc.confirm(Some(n)).await.unwrap();
        }
        let names: Vec<String> = svc.list().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["ana", "beatriz", "Marcos", "Rui"]);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_error() {
        let (repo, svc) = setup();
        repo.fail(true);
        assert!(matches!(svc.confirm(Some("Ana")).await, Err(ServiceError::Db(_))));
        assert!(matches!(svc.list().await, Err(ServiceError::Db(_))));
        assert!(matches!(svc.manage(manage("clear", None, None)).await, Err(ServiceError::Db(_))));
        repo.fail(false);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_case_insensitively() {
        let (repo, svc) = setup();
        svc.confirm(Some("Ana")).await.unwrap();
        let out = svc.manage(manage("delete", Some("ANA"), None)).await.unwrap();
        assert!(matches!(out, ManageOutcome::Removed(ref g) if g.name == "Ana"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found_and_keeps_size() {
        let (repo, svc) = setup();
        svc.confirm(Some("Ana")).await.unwrap();
        let out = svc.manage(manage("delete", Some("Bia"), None)).await.unwrap();
        assert_eq!(out, ManageOutcome::NotFound);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn edit_renames_and_stamps() {
        let (_, svc) = setup();
        let original = svc.confirm(Some("Ana")).await.unwrap();
        let out = svc.manage(manage("edit", Some(" ana "), Some(" Ana Maria "))).await.unwrap();
        match out {
            ManageOutcome::Updated { previous, guest } => {
                assert_eq!(previous, " ana ");
                assert_eq!(guest.name, "Ana Maria");
                assert_eq!(guest.confirmed_at, original.confirmed_at);
                assert!(guest.updated_at.is_some());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_missing_is_not_found_and_keeps_collection() {
        let (_, svc) = setup();
        svc.confirm(Some("Ana")).await.unwrap();
        let before = svc.list().await.unwrap();
        let out = svc.manage(manage("edit", Some("Bia"), Some("Beatriz"))).await.unwrap();
        assert_eq!(out, ManageOutcome::NotFound);
        assert_eq!(svc.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn edit_onto_existing_name_is_permitted() {
        let (repo, svc) = setup();
        svc.confirm(Some("Ana")).await.unwrap();
        svc.confirm(Some("Bia")).await.unwrap();
        svc.manage(manage("edit", Some("Bia"), Some("Ana"))).await.unwrap();
        assert_eq!(repo.len(), 2);
        assert!(svc.list().await.unwrap().iter().all(|g| g.name == "Ana"));
    }

    #[tokio::test]
    async fn edit_and_delete_require_names() {
        let (_, svc) = setup();
        let err = svc.manage(manage("delete", None, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == NAME_REQUIRED));
        let err = svc.manage(manage("edit", Some("Ana"), Some("  "))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == NEW_NAME_REQUIRED));
    }

    #[tokio::test]
    async fn clear_empties_everything_and_is_repeatable() {
        let (_, svc) = setup();
        for n in ["Ana", "Bia", "Caio"] {
            svc.confirm(Some(n)).await.unwrap();
        }
        assert_eq!(svc.manage(manage("clear", None, None)).await.unwrap(), ManageOutcome::Cleared);
        assert!(svc.list().await.unwrap().is_empty());
        assert_eq!(svc.manage(manage("clear", None, None)).await.unwrap(), ManageOutcome::Cleared);
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_action_changes_nothing() {
        let (repo, svc) = setup();
        svc.confirm(Some("Ana")).await.unwrap();
        assert_eq!(svc.manage(manage("bogus", Some("Ana"), None)).await.unwrap(), ManageOutcome::Unrecognized);
        assert_eq!(svc.manage(ManageRequest::default()).await.unwrap(), ManageOutcome::Unrecognized);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let repo: Arc<dyn GuestRepository> = Arc::new(MockGuestRepository::default());
        let svc = GuestService::new(repo);
        assert_eq!(svc.backend(), "memory");
        svc.confirm(Some("Ana")).await.unwrap();
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }
}
