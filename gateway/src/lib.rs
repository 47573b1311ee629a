//! HTTP admin gateway over a Canopy entity store.
//!
//! Exposes browse, count, and bulk-delete endpoints driven entirely by
//! string query parameters. All translation lives in the core crates;
//! this crate only decodes the query string, runs the store call, and
//! shapes the response.

mod api;
mod params;

pub use api::{build_router, ApiError, GatewayState};
