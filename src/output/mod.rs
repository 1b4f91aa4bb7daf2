//! Output targets and parameter routing
//!
//! Thin layer between the mapping engine and the renderers: each target
//! stands for one category of output and keeps the parameters routed to it.

mod router;
mod target;

pub use router::{OutputRouter, Routed};
pub use target::{OutputCategory, OutputTarget};
