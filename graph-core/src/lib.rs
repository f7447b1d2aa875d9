pub mod config;
pub mod error;
pub mod health;
pub mod tracing_init;

pub use config::{ConfigError, GraphConfig};
pub use error::AppError;
pub use health::{health_routes, HealthIndicator, HealthState, HealthStatus};
pub use tracing_init::{init_tracing, request_id_middleware, RequestId};
