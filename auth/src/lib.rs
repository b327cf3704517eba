//! Credential primitives for the case management service.
//!
//! - Password hashing (Argon2id)
//! - Bearer token issuing and validation (HS256 JWT)
//!
//! Neither component touches storage; the service composes them with its
//! identity repository.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenConfig, TokenService};
//!
//! let tokens = TokenService::with_system_clock(&TokenConfig::new(
//!     "secret_key_at_least_32_bytes_long!",
//! ));
//! let token = tokens.issue("alice").unwrap();
//! assert_eq!(tokens.validate(&token).unwrap(), "alice");
//! ```

pub mod password;
pub mod token;

pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Clock;
pub use token::ManualClock;
pub use token::SystemClock;
pub use token::TokenConfig;
pub use token::TokenError;
pub use token::TokenService;
