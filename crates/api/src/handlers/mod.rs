//! HTTP handler functions, grouped by resource.

pub mod comments;
pub mod entries;
