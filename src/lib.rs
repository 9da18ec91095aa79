pub mod config;
pub mod errors;
pub mod http_api;
pub mod ident;
pub mod logging;
pub mod reqsim;
pub mod store;
pub mod upstream;
pub mod workload;

pub use config::ServiceConfig;
pub use errors::ConfigValidationError;
pub use errors::InitializationError;
pub use errors::ServiceError;
pub use errors::StoreError;
pub use reqsim::ReqSim;
pub use store::RecordStore;
