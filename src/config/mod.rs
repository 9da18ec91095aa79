mod http;
mod log;
mod service;
mod store;
mod upstream;
mod workload;

pub use http::Config as HttpConfig;
pub use log::Config as LogConfig;
pub use service::Config as ServiceConfig;
pub use store::Config as StoreConfig;
pub use upstream::Config as UpstreamConfig;
pub use workload::Config as WorkloadConfig;
