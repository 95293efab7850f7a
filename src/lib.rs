#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod session;
pub mod token;
pub mod types;

// Re-exports for convenient access
pub use client::AccountClient;
pub use error::Error;
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpProvider};
pub use session::{AuthProvider, ProviderSession};
pub use token::{normalize, SessionToken};
pub use types::{Credentials, DeviceId, DeviceRecord};
