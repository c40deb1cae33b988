//! External API integrations

pub mod http;
pub mod platform;

pub use http::HttpPlatformApi;
pub use platform::{AuthGrant, PlatformApi, Session};
