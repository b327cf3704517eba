pub mod access;
pub mod assignment;
pub mod errors;
pub mod identity;
