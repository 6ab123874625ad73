//! HTTP handlers for entity CRUD and service metadata.

pub mod entity;
pub mod meta;
