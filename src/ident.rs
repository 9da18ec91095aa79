use uuid::Uuid;

/// Generate a unique request ID
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_format() {
        let id = new_request_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.to_string(), id);
        assert_eq!(id.len(), 36);
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn test_ids_are_unique() {
        let id1 = new_request_id();
        let id2 = new_request_id();
        assert_ne!(id1, id2);
    }
}
