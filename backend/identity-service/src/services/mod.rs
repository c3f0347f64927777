/// Business logic layer for identity-service
pub mod identity;

pub use identity::IdentityService;
