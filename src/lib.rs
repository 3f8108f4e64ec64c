pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod views;

pub use error::{AppError, AppResult, ValidationError};
pub use middleware::VoterIp;
pub use response::ApiResponse;
