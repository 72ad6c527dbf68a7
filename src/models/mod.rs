pub mod profile;
pub mod provider;
