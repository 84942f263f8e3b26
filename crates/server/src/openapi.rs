use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct ConfirmRequestDoc { pub name: String }

#[derive(ToSchema)]
pub struct GuestDoc {
    pub name: String,
    #[schema(value_type = String, format = DateTime)]
    pub confirmed_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<String>,
}

#[derive(ToSchema)]
pub struct ManageRequestDoc {
    /// `delete`, `edit` or `clear`
    pub action: String,
    pub name: Option<String>,
    pub new_name: Option<String>,
}

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: Option<String>,
    pub database: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::guests::confirm_presence,
        crate::routes::guests::list_guests,
        crate::routes::admin::manage,
    ),
    components(
        schemas(
            ConfirmRequestDoc,
            GuestDoc,
            ManageRequestDoc,
            HealthResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "guests"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
