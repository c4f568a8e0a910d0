mod error;
pub use error::ApiError;

mod handler;
pub use handler::{ApiHandler, Load};

mod adapter;
pub use adapter::RunnerApiAdapter;

#[cfg(feature = "http")]
mod dto;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
