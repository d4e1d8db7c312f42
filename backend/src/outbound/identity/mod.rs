//! Identity provider adapters.
//!
//! Passwords live with a hosted GoTrue-compatible auth service; this module
//! provides the HTTP implementation of the `IdentityProvider` port.

mod dto;
mod http_provider;

pub use http_provider::{HttpIdentityProvider, IdentityKeys};
