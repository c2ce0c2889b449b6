//! Turning recipes into finished parts.
//!
//! A [`Recipe`] is an ordered list of boolean steps against one base solid.
//! A [`Part`] walks it through `Draft → Building → Finalized → Exported`,
//! and the [`PartAssembler`] runs many parts side by side.

pub mod assembler;
pub mod config;
pub mod part;
pub mod recipes;
pub mod step;

pub use assembler::{AssemblyReport, PartAssembler, PartOutcome};
pub use config::{AssemblyConfig, ContactMargins};
pub use part::{Part, PartFailure, PartState, Recipe};
pub use step::{BuildContext, Contact, Placement, Step, ThreadSpec, ToolSpec};
