use async_trait::async_trait;

use super::domain::Guest;
use crate::errors::ServiceError;

/// Persistence abstraction over the guest collection.
///
/// Name arguments are matched case-insensitively after trimming.
/// `insert` must refuse to create a second guest with the same key.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Guest>, ServiceError>;
    async fn insert(&self, name: &str) -> Result<Guest, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Guest>, ServiceError>;
    async fn delete_by_name(&self, name: &str) -> Result<Option<Guest>, ServiceError>;
    async fn update_name(&self, old_name: &str, new_name: &str) -> Result<Option<Guest>, ServiceError>;
    async fn clear_all(&self) -> Result<(), ServiceError>;

    /// Short label for the active backing, reported by health checks.
    fn backend(&self) -> &'static str;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::guest::domain::sort_guests;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockGuestRepository {
        guests: Mutex<Vec<Guest>>,
        failing: AtomicBool,
    }

    impl MockGuestRepository {
        /// Make every subsequent call fail with a store error.
        pub fn fail(&self, on: bool) { self.failing.store(on, Ordering::SeqCst); }

        pub fn len(&self) -> usize { self.guests.lock().map(|g| g.len()).unwrap_or(0) }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn guests(&self) -> Result<std::sync::MutexGuard<'_, Vec<Guest>>, ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::store("mock store unavailable"));
            }
            self.guests.lock().map_err(ServiceError::store)
        }
    }

    #[async_trait]
    impl GuestRepository for MockGuestRepository {
        async fn find_by_name_ci(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
            Ok(self.guests()?.iter().find(|g| g.matches(name)).cloned())
        }

        async fn insert(&self, name: &str) -> Result<Guest, ServiceError> {
            let mut guests = self.guests()?;
            if guests.iter().any(|g| g.matches(name)) {
                return Err(ServiceError::Conflict(name.trim().to_string()));
            }
            let guest = Guest::new(name);
            guests.push(guest.clone());
            Ok(guest)
        }

        async fn list_all(&self) -> Result<Vec<Guest>, ServiceError> {
            let mut list = self.guests()?.clone();
            sort_guests(&mut list);
            Ok(list)
        }

        async fn delete_by_name(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
            let mut guests = self.guests()?;
            Ok(guests.iter().position(|g| g.matches(name)).map(|i| guests.remove(i)))
        }

        async fn update_name(&self, old_name: &str, new_name: &str) -> Result<Option<Guest>, ServiceError> {
            let mut guests = self.guests()?;
            Ok(guests.iter_mut().find(|g| g.matches(old_name)).map(|g| {
                g.rename(new_name);
                g.clone()
            }))
        }

        async fn clear_all(&self) -> Result<(), ServiceError> {
            self.guests()?.clear();
            Ok(())
        }

        fn backend(&self) -> &'static str { "memory" }
    }
}
