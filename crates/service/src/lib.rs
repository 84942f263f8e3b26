//! Service layer for the RSVP site: guest confirmation and admin maintenance.
//! - `guest` holds the domain, the persistence trait and the business service.
//! - `file` and `guest::repo::seaorm` are the two interchangeable backings.
//! - `storage` carries the reusable JSON document store.

pub mod errors;
pub mod guest;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod file;
