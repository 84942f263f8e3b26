//! Storage helpers for the service layer
//!
//! Reusable file-backed persistence shared by the JSON-backed repositories.

pub mod json_document;
