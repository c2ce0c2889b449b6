//! Procedural CSG for small mechanical parts.
//!
//! Gear and thread cross-sections are swept into solids, closed up where a
//! sweep leaves holes, and combined with exact boolean operations. Each part
//! is an ordered recipe of such steps; finished parts are handed to an
//! [`export::ExportSink`] as plain triangle meshes.

pub mod assembly;
pub mod error;
pub mod export;
pub mod geometry;
pub mod host;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{ForgeError, Result};
