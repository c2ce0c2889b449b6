use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the csgforge pipeline.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error(transparent)]
    Boolean(#[from] BooleanError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ForgeError {
    /// Short name of the error family, used in part failure reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Profile(_) => "ProfileError",
            Self::Sweep(_) => "SweepError",
            Self::Repair(_) => "RepairError",
            Self::Boolean(_) => "BooleanError",
            Self::Export(_) => "ExportError",
            Self::Tessellation(_) => "TessellationError",
            Self::Host(_) => "HostError",
            Self::Operation(_) => "OperationError",
            Self::Assembly(inner) => match inner {
                AssemblyError::StepFailed { source, .. } => source.kind(),
                _ => "AssemblyError",
            },
            Self::Config(_) => "ConfigError",
        }
    }
}

/// Invalid parameters for a 2D cross-section.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("gear needs at least 3 teeth, got {0}")]
    InvalidTeeth(usize),

    #[error("gear modulus must be positive and finite, got {0}")]
    InvalidModulus(f64),

    #[error("invalid thread parameters: {0}")]
    InvalidThread(String),

    #[error("profile polygon is self-intersecting")]
    SelfIntersecting,
}

/// Invalid parameters for turning a profile into a solid.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("extrusion thickness must be positive, got {0}")]
    NonPositiveThickness(f64),

    #[error("sweep pitch must be positive, got {0}")]
    NonPositivePitch(f64),

    #[error("sweep turns must be positive, got {0}")]
    NonPositiveTurns(f64),

    #[error("helical sweep needs at least 8 steps per turn, got {0}")]
    TooFewSteps(usize),

    #[error("profile is degenerate: {0}")]
    DegenerateProfile(String),

    #[error("sweep axis must be non-zero")]
    ZeroAxis,

    #[error("helical sweep needs a profile in the radial half-plane")]
    NotRadialProfile,
}

/// Problems found while closing and orienting an open mesh.
///
/// `NonPlanarLoop` and `SelfIntersectingLoop` are reported alongside a
/// best-effort result; the remaining variants abort the repair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepairError {
    #[error("boundary loop {loop_index} is non-planar (deviation {deviation:e})")]
    NonPlanarLoop { loop_index: usize, deviation: f64 },

    #[error("boundary loop {loop_index} is self-intersecting")]
    SelfIntersectingLoop { loop_index: usize },

    #[error("boundary edges do not close into loops at vertex {0}")]
    OpenBoundaryChain(u32),

    #[error("edge ({0}, {1}) borders more than two faces")]
    NonManifoldEdge(u32, u32),

    #[error("mesh is not orientable")]
    NonOrientable,
}

/// Failures of the exact boolean solver.
#[derive(Debug, Error)]
pub enum BooleanError {
    #[error("{0} operand is not a closed two-manifold")]
    NonManifoldInput(&'static str),

    #[error("operands touch without crossing near {0:?}; apply a contact margin")]
    CoincidentGeometry([f64; 3]),

    #[error("triangle pair ({0}, {1}) produced {2} intersection points")]
    InconsistentIntersection(usize, usize, usize),

    #[error("retriangulation failed: {0}")]
    Retriangulation(String),

    #[error("result is not two-manifold: {0}")]
    NonManifoldResult(String),

    #[error("result has {0} disconnected shells")]
    MultipleShells(usize),

    #[error("result is empty")]
    EmptyResult,
}

/// Errors surfaced by an export sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export to {path} failed: {reason}")]
    Sink { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to polygon triangulation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("triangulation input rejected: {0}")]
    InvalidPoint(String),

    #[error("point {0} duplicates an earlier point")]
    DuplicatePoint(usize),

    #[error("constraint edge ({0}, {1}) crosses an existing constraint")]
    CrossingConstraint(usize, usize),
}

/// Errors raised by the geometry host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("solid not found: {0}")]
    SolidNotFound(String),

    #[error("invalid primitive: {0}")]
    InvalidPrimitive(String),
}

/// Errors related to mesh operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from running part recipes.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("part {part}: step {step} ({label}) failed: {source}")]
    StepFailed {
        part: String,
        step: usize,
        label: String,
        #[source]
        source: Box<ForgeError>,
    },

    #[error("part {part} has no finished mesh to export")]
    MissingOutput { part: String },

    #[error("a part named {0} is already registered")]
    DuplicatePart(String),

    #[error("part {part} is {state} and can no longer be modified")]
    Frozen { part: String, state: &'static str },

    #[error("part {part} cannot go from {from} to {to}")]
    InvalidTransition {
        part: String,
        from: &'static str,
        to: &'static str,
    },
}

/// Errors from loading assembly configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{owner}: {field} must be finite and not negative, got {value}")]
    InvalidMargin {
        owner: String,
        field: &'static str,
        value: f64,
    },
}

/// Convenience type alias for results using [`ForgeError`].
pub type Result<T> = std::result::Result<T, ForgeError>;
