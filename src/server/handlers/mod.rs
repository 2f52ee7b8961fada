//! HTTP request handlers.

mod analyze;
mod health;
mod helpers;
mod openapi;
mod search;

pub use analyze::{analyze, get_analysis};
pub use health::health;
pub use helpers::{method_not_allowed, not_found};
pub use openapi::openapi_spec;
pub use search::search;
