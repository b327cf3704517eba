pub mod authentication;
pub mod errors;
pub mod gate;
