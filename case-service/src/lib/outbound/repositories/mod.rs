pub mod assignment;
pub mod identity;
pub mod memory;

pub use assignment::PostgresAssignmentRepository;
pub use identity::PostgresIdentityRepository;
pub use memory::InMemoryStore;
