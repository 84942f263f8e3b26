//! Guest module: three-layer architecture (domain, repository, service).
//!
//! The repository trait is the persistence seam; `repo::seaorm` backs it with a
//! table and `crate::file::guest_store` with a JSON document.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use repository::GuestRepository;
pub use service::GuestService;
