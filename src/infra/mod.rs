pub mod crypto;
pub mod factory;
pub mod repositories;
