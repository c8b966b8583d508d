//! Payroll record service library.
//!
//! Fifteen payroll entities share one generic create/list/get/update/delete
//! engine driven by static entity descriptors. The crate follows a
//! hexagonal layout: `domain` holds the descriptors and engine, `inbound`
//! the actix-web adapter and `outbound` the Diesel/PostgreSQL adapter.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
