//! Common test utilities for Listward integration tests
//!
//! Provides a catalog service whose methods are bound through an
//! `Interceptor`, plus the declaration file describing their tags.
//!
//! Each test binary compiles this module separately and uses a different
//! subset of it.

#![allow(dead_code, unused_imports)]

pub mod catalog;

pub use catalog::{catalog_interceptor, Catalog, DECLARATIONS};
