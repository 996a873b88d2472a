//! BloodBridge: blood inventory and request reconciliation.
//!
//! The [`domain`] holds the reconciliation engine and its ports,
//! [`outbound`] provides in-memory and PostgreSQL stores plus notifiers, and
//! [`inbound`] exposes the JSON gateway.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// OpenAPI document used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
