mod config;
mod init;
mod service;
mod store;

pub use config::ConfigValidationError;
pub use init::InitializationError;
pub use service::ServiceError;
pub use store::StoreError;
