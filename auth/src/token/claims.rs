use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Bearer token payload.
///
/// Uses the RFC 7519 registered claim names. Every field is optional on the
/// wire so that a token lacking one decodes and is then rejected with a
/// precise error instead of a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username of the identity)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims for `subject`, issued at `now` and valid for `ttl`.
    ///
    /// Returns `None` when `now + ttl` is outside the representable range.
    pub fn for_subject(subject: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let exp = now.checked_add_signed(ttl)?;

        Some(Self {
            sub: Some(subject.to_string()),
            iat: Some(now.timestamp()),
            exp: Some(exp.timestamp()),
        })
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// A token is valid while `now < exp`; it is expired from `exp` onward.
    /// Claims without `exp` never report expired here, callers reject them
    /// separately.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| current_timestamp >= exp)
    }
}
