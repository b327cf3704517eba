pub mod claims;
pub mod clock;
pub mod errors;
pub mod service;

pub use claims::Claims;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use errors::TokenError;
pub use service::TokenConfig;
pub use service::TokenService;
