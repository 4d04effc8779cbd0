pub mod alert;
pub mod config;
#[cfg(feature = "dashboard")]
pub mod dashboard;
pub mod metrics;
pub mod monitor;
pub mod notify;
pub mod probe;
pub mod render;
pub mod sample;
pub mod scheduler;
pub mod store;
pub mod target;
pub mod util;
