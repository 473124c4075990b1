#![deny(unsafe_code)]
//! # signa-registry
//!
//! The read-only configuration the detection pipeline consumes:
//!
//! - [`PatternRegistry`]: validated, ordered `name -> pattern` table, loaded once
//! - [`GestureCatalog`]: descriptive metadata for each symbol of the alphabet
//!
//! A registry that fails validation never reaches the matcher; the error is
//! fatal to session start-up.

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod registry;

pub use catalog::{GestureCatalog, GestureInfo};
pub use error::{RegistryError, RegistryResult};
pub use registry::{PatternRegistry, RegistryBuilder};
