use std::sync::Arc;

use service::guest::{GuestRepository, GuestService};

/// Shared handler state. The backing store is chosen at startup and hidden behind the trait.
#[derive(Clone)]
pub struct AppState {
    pub guests: Arc<GuestService<dyn GuestRepository>>,
    pub environment: Option<String>,
}

impl AppState {
    pub fn new(repo: Arc<dyn GuestRepository>, environment: Option<String>) -> Self {
        Self { guests: Arc::new(GuestService::new(repo)), environment }
    }
}
