//! Shared plumbing for the RSVP workspace: logging setup, runtime checks and
//! wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_omits_unset_fields() {
        let h = types::Health::ok(None, None);
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["status"], "OK");
        assert!(json.get("environment").is_none());
        assert!(json.get("database").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn health_carries_environment_and_database() {
        let h = types::Health::ok(Some("production".into()), Some("postgres".into()));
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["environment"], "production");
        assert_eq!(json["database"], "postgres");
    }
}
