pub mod assistant;
pub mod error;
pub mod limiter;
pub mod services;
pub mod traits;
