use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;

/// Startup configuration for [`TokenService`].
///
/// Rotating the secret means building a new `TokenService` from a new
/// config; tokens signed with the previous secret stop validating at once.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    pub const DEFAULT_TTL_MINUTES: i64 = 30;

    /// Config with the default 30 minute lifetime.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(Self::DEFAULT_TTL_MINUTES),
        }
    }

    /// Override the default token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn secret_len(&self) -> usize {
        self.secret.len()
    }
}

/// Issues and validates HS256-signed bearer tokens.
///
/// Expiry is checked against the injected [`Clock`] with zero leeway rather
/// than by `jsonwebtoken`, which reads the system time and allows 60 seconds
/// of slack by default.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service reading time from `clock`.
    pub fn new(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            algorithm: Algorithm::HS256,
            default_ttl: config.ttl,
            clock,
        }
    }

    /// Create a token service backed by the wall clock.
    pub fn with_system_clock(config: &TokenConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` with the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed, or the expiry overflows
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims::for_subject(subject, self.clock.now(), ttl).ok_or_else(|| {
            TokenError::EncodingFailed(format!("token lifetime {} is out of range", ttl))
        })?;

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// Signature and structure are verified before any claim is looked at.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, wrong algorithm, or malformed token
    /// * `MalformedClaims` - Signature is valid but `sub` or `exp` is absent
    /// * `ExpiredToken` - The clock is at or past `exp`
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.decode(token)?;

        let subject = claims
            .sub
            .clone()
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| TokenError::MalformedClaims("sub".to_string()))?;

        if claims.exp.is_none() {
            return Err(TokenError::MalformedClaims("exp".to_string()));
        }

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::ExpiredToken);
        }

        Ok(subject)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::token::clock::ManualClock;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn service_with_clock() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let service = TokenService::new(&TokenConfig::new(SECRET), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_issue_and_validate() {
        let (service, _) = service_with_clock();

        let token = service.issue("alice").expect("Failed to issue token");
        assert!(!token.is_empty());

        assert_eq!(service.validate(&token), Ok("alice".to_string()));
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        let service = TokenService::with_system_clock(&TokenConfig::new(SECRET));
        assert_eq!(service.default_ttl(), Duration::minutes(30));
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let (service, clock) = service_with_clock();
        let token = service
            .issue_with_ttl("alice", Duration::minutes(5))
            .unwrap();

        clock.advance(Duration::minutes(5) - Duration::seconds(1));
        assert_eq!(service.validate(&token), Ok("alice".to_string()));

        clock.advance(Duration::seconds(1));
        assert_eq!(service.validate(&token), Err(TokenError::ExpiredToken));

        clock.advance(Duration::hours(24));
        assert_eq!(service.validate(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_out_of_range_ttl_is_an_encoding_error() {
        let (service, _) = service_with_clock();

        assert!(matches!(
            service.issue_with_ttl("alice", Duration::days(365 * 300_000)),
            Err(TokenError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_default_ttl_expiry() {
        let (service, clock) = service_with_clock();
        let token = service.issue("alice").unwrap();

        clock.advance(Duration::minutes(TokenConfig::DEFAULT_TTL_MINUTES));
        assert_eq!(service.validate(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_tampering_any_byte_invalidates_token() {
        let (service, _) = service_with_clock();
        let token = service.issue("alice").unwrap();

        for (index, original) in token.char_indices() {
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            let result = service.validate(&tampered);
            assert!(
                matches!(result, Err(TokenError::InvalidToken(_))),
                "byte {} tampered, got {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (service, _) = service_with_clock();

        for garbage in ["", "invalid.token.here", "a.b", "not-a-token"] {
            assert!(matches!(
                service.validate(garbage),
                Err(TokenError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn test_rotated_secret_invalidates_tokens() {
        let (service, clock) = service_with_clock();
        let rotated = TokenService::new(
            &TokenConfig::new(b"another_secret_key_at_least_32_bytes".to_vec()),
            clock,
        );

        let token = service.issue("alice").unwrap();
        assert!(matches!(
            rotated.validate(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        let (service, _) = service_with_clock();
        let claims = Claims::new().with_expiration(1_700_000_000 + 600);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            service.validate(&token),
            Err(TokenError::MalformedClaims("sub".to_string()))
        );
    }

    #[test]
    fn test_missing_expiry_is_malformed() {
        let (service, _) = service_with_clock();
        let claims = Claims::new().with_subject("alice");
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            service.validate(&token),
            Err(TokenError::MalformedClaims("exp".to_string()))
        );
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let (service, _) = service_with_clock();
        let claims = Claims::new()
            .with_subject("alice")
            .with_expiration(1_700_000_000 + 600);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }
}
