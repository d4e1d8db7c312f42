//! Mess subscription backend.
//!
//! Owners manage memberships, attendance, menus and polls for their mess;
//! members mark attendance and vote; guests browse the public feed. The crate
//! is laid out as a hexagon: [`domain`] holds entities, services and ports,
//! [`inbound`] exposes them over HTTP and [`outbound`] implements the driven
//! ports against PostgreSQL and the hosted identity provider.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
