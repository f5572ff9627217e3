use parking_lot::RwLock;
use reqwest::header::HeaderMap;

pub(crate) const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub(crate) const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Request quota as last reported by the server.
///
/// The counters are advisory. The server is authoritative and nothing here enforces
/// `remaining <= limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateState {
    pub limit: u32,
    pub remaining: u32,
}

impl Default for RateState {
    /// Before the first call completes we assume the most conservative quota.
    fn default() -> Self {
        RateState {
            limit: 1,
            remaining: 1,
        }
    }
}

/// Shared holder for the [`RateState`] of one client.
#[derive(Debug, Default)]
pub(crate) struct RateTracker {
    state: RwLock<RateState>,
}

impl RateTracker {
    pub fn get(&self) -> RateState {
        *self.state.read()
    }

    /// Takes the counters from the response headers of a successful call.
    ///
    /// Both headers must be present and well-formed, otherwise the state is left unchanged.
    pub fn update(&self, headers: &HeaderMap) {
        let (Some(limit), Some(remaining)) = (
            header_u32(headers, LIMIT_HEADER),
            header_u32(headers, REMAINING_HEADER),
        ) else {
            return;
        };

        *self.state.write() = RateState { limit, remaining };

        log::trace!("Rate limit now {remaining}/{limit}");
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    let value = headers.get(name)?;

    match value.to_str().ok().and_then(|v| v.trim().parse().ok()) {
        Some(n) => Some(n),
        None => {
            log::warn!("Ignoring malformed {name} header: {value:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_initial_state() {
        let tracker = RateTracker::default();
        assert_eq!(tracker.get(), RateState { limit: 1, remaining: 1 });
    }

    #[test]
    fn test_update_from_headers() {
        let tracker = RateTracker::default();
        tracker.update(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "42"),
        ]));
        assert_eq!(tracker.get(), RateState { limit: 100, remaining: 42 });
    }

    #[test]
    fn test_first_value_wins() {
        let tracker = RateTracker::default();
        tracker.update(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-limit", "5"),
            ("x-ratelimit-remaining", "7"),
            ("x-ratelimit-remaining", "3"),
        ]));
        assert_eq!(tracker.get(), RateState { limit: 100, remaining: 7 });
    }

    #[test]
    fn test_missing_and_malformed_headers_are_ignored() {
        let tracker = RateTracker::default();
        tracker.update(&headers(&[
            ("x-ratelimit-limit", "60"),
            ("x-ratelimit-remaining", "59"),
        ]));

        tracker.update(&HeaderMap::new());
        assert_eq!(tracker.get(), RateState { limit: 60, remaining: 59 });

        tracker.update(&headers(&[
            ("x-ratelimit-limit", "lots"),
            ("x-ratelimit-remaining", "58"),
        ]));
        assert_eq!(tracker.get(), RateState { limit: 60, remaining: 59 });
    }

    #[test]
    fn test_single_header_is_ignored() {
        let tracker = RateTracker::default();

        tracker.update(&headers(&[("x-ratelimit-remaining", "0")]));
        assert_eq!(tracker.get(), RateState::default());

        tracker.update(&headers(&[("x-ratelimit-limit", "500")]));
        assert_eq!(tracker.get(), RateState::default());
    }
}
