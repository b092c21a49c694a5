//! Topology resolution
//!
//! Turns a possibly contradictory request into the number of brokers the
//! environment actually runs.

/// Largest broker topology an environment supports
pub const MAX_BROKERS: u32 = 2;

/// Resolve the effective broker count for a request
///
/// Topics and the schema registry both need a broker, so a request for no
/// brokers is bumped to one when either is present. Requests above
/// [`MAX_BROKERS`] are clamped.
pub fn resolve_broker_count(requested: i32, topics: &[String], with_registry: bool) -> u32 {
    let needs_broker = with_registry || !topics.is_empty();

    if requested < 1 && needs_broker {
        1
    } else if requested < 1 {
        0
    } else if requested > MAX_BROKERS as i32 {
        MAX_BROKERS
    } else {
        requested as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_brokers_bumped_for_topics_or_registry() {
        for requested in [-5, -1, 0] {
            assert_eq!(resolve_broker_count(requested, &topics(&["orders"]), false), 1);
            assert_eq!(resolve_broker_count(requested, &[], true), 1);
            assert_eq!(resolve_broker_count(requested, &topics(&["a", "b"]), true), 1);
        }
    }

    #[test]
    fn test_no_brokers_without_dependents() {
        assert_eq!(resolve_broker_count(0, &[], false), 0);
        assert_eq!(resolve_broker_count(-3, &[], false), 0);
    }

    #[test]
    fn test_large_requests_clamped() {
        for requested in [3, 4, 10, i32::MAX] {
            assert_eq!(resolve_broker_count(requested, &[], false), MAX_BROKERS);
            assert_eq!(resolve_broker_count(requested, &topics(&["orders"]), true), MAX_BROKERS);
        }
    }

    #[test]
    fn test_supported_requests_kept() {
        for requested in 0..=2 {
            assert_eq!(resolve_broker_count(requested, &[], false), requested as u32);
        }
        assert_eq!(resolve_broker_count(2, &topics(&["orders"]), true), 2);
        assert_eq!(resolve_broker_count(1, &[], true), 1);
    }
}
