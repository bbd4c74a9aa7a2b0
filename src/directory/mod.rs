//! Directory service access
//!
//! The tree walker only sees the [`Directory`] trait. `GraphDirectory` talks
//! to Microsoft Graph over HTTP; `StaticDirectory` serves a JSON fixture for
//! offline runs and tests.

mod traits;
mod graph;
mod fixture;

pub use traits::*;
pub use graph::{GraphConfig, GraphDirectory};
pub use fixture::StaticDirectory;
#[cfg(test)]
pub use fixture::FixturePerson;
