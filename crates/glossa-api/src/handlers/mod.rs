//! HTTP handlers for the glossa API.

pub mod annotations;
pub mod health;
