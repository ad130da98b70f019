//! Quota header rendering and the over-limit response body.

use chrono::{DateTime, SecondsFormat, Utc};

use super::limiter::Decision;

/// Maximum admitted requests per window.
pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
/// Admitted requests left in the current window.
pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
/// ISO-8601 timestamp at which the current window resets.
pub const X_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
/// Whole seconds until the window resets; sent only when over limit.
pub const RETRY_AFTER: &str = "Retry-After";

impl Decision {
    /// Render this decision as response header pairs.
    ///
    /// Always produces the three `X-RateLimit-*` headers; `Retry-After`
    /// is appended only when the request was rejected.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        self.headers_at(Utc::now())
    }

    pub(crate) fn headers_at(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (X_RATE_LIMIT_LIMIT, self.limit.to_string()),
            (X_RATE_LIMIT_REMAINING, self.remaining.to_string()),
            (
                X_RATE_LIMIT_RESET,
                self.reset_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ];

        if !self.allowed {
            headers.push((RETRY_AFTER, retry_after_secs(self.reset_at, now).to_string()));
        }

        headers
    }
}

/// Seconds until `reset_at`, rounded up and clamped at zero.
fn retry_after_secs(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (reset_at - now).num_milliseconds().max(0);
    (millis + 999) / 1000
}

/// JSON body for the `429 Too Many Requests` response.
pub fn rejection_body() -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "message": "Too many requests, please try again later",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn decision(allowed: bool, remaining: u64, reset_at: DateTime<Utc>) -> Decision {
        Decision {
            allowed,
            limit: 100,
            remaining,
            reset_at,
        }
    }

    #[test]
    fn test_admitted_decision_has_three_headers() {
        let reset_at = base() + chrono::Duration::seconds(60);
        let headers = decision(true, 42, reset_at).headers_at(base());

        assert_eq!(
            headers,
            vec![
                (X_RATE_LIMIT_LIMIT, "100".to_string()),
                (X_RATE_LIMIT_REMAINING, "42".to_string()),
                (X_RATE_LIMIT_RESET, "2024-01-01T12:01:00.000Z".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejected_decision_adds_retry_after() {
        let reset_at = base() + chrono::Duration::seconds(90);
        let headers = decision(false, 0, reset_at).headers_at(base());

        assert_eq!(headers.len(), 4);
        assert_eq!(headers[3], (RETRY_AFTER, "90".to_string()));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let reset_at = base() + chrono::Duration::milliseconds(1500);
        assert_eq!(retry_after_secs(reset_at, base()), 2);
    }

    #[test]
    fn test_retry_after_clamps_at_zero() {
        let reset_at = base() - chrono::Duration::seconds(5);
        assert_eq!(retry_after_secs(reset_at, base()), 0);
    }

    #[test]
    fn test_rejection_body_shape() {
        let body = rejection_body();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Too many requests, please try again later");
    }
}
