//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// Used to tag each scenario run in logs. UUID v7 embeds a timestamp, so
/// ids sort in the order scenarios started.
#[must_use]
pub fn generate_scenario_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_scenario_id_format() {
        let id = generate_scenario_id();
        // 8-4-4-4-12 = 36 chars
        assert_eq!(id.len(), 36);
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 7);
    }

    #[test]
    fn test_generate_scenario_id_uniqueness() {
        let id1 = generate_scenario_id();
        let id2 = generate_scenario_id();
        assert_ne!(id1, id2);
    }
}
