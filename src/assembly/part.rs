use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{AssemblyError, BooleanError, ForgeError, Result};
use crate::export::ExportSink;
use crate::operations::query::IsValid;
use crate::tessellation::{TessellateSolid, TriangleMesh};
use crate::topology::{SolidId, SolidStore};

use super::step::{BuildContext, Placement, Step, ToolSpec};

/// Everything needed to build and export one mechanical part.
///
/// Steps run strictly in order; each assumes the geometry the previous ones
/// left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    /// The first solid; every step is applied to it.
    pub base: ToolSpec,
    pub at: Placement,
    pub steps: Vec<Step>,
    /// File name handed to the export sink.
    pub file_name: String,
    /// Uniform export scale.
    pub scale: f64,
}

/// Lifecycle of a [`Part`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    Draft,
    Building,
    Finalized,
    Exported,
    /// A step or the export failed; see [`Part::failure`].
    Failed,
}

impl PartState {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Building => "Building",
            Self::Finalized => "Finalized",
            Self::Exported => "Exported",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a part failed.
///
/// Step 0 is the base solid, steps `1..=n` are the recipe steps, and `n + 1`
/// is finalization or export.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFailure {
    pub step: usize,
    pub label: String,
    /// Error family, e.g. `BooleanError`.
    pub kind: &'static str,
    pub message: String,
}

/// One part being built. Owns every solid it creates.
#[derive(Debug)]
pub struct Part {
    recipe: Recipe,
    state: PartState,
    host: SolidStore,
    target: Option<SolidId>,
    steps_done: usize,
    output: Option<TriangleMesh>,
    failure: Option<PartFailure>,
}

impl Part {
    #[must_use]
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            state: PartState::Draft,
            host: SolidStore::new(),
            target: None,
            steps_done: 0,
            output: None,
            failure: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.recipe.name
    }

    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    #[must_use]
    pub fn state(&self) -> PartState {
        self.state
    }

    /// Number of recipe steps applied so far.
    #[must_use]
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// The finished mesh, once finalized.
    #[must_use]
    pub fn output(&self) -> Option<&TriangleMesh> {
        self.output.as_ref()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&PartFailure> {
        self.failure.as_ref()
    }

    /// Number of solids the part currently holds.
    #[must_use]
    pub fn live_solids(&self) -> usize {
        self.host.len()
    }

    /// Builds the base solid. `Draft → Building`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidTransition`] outside `Draft`, or
    /// [`AssemblyError::StepFailed`] if the base cannot be built.
    pub fn begin(&mut self, ctx: &BuildContext) -> Result<()> {
        self.expect_state(PartState::Draft, PartState::Building)?;
        let built = self
            .recipe
            .base
            .build(&mut self.host, &self.recipe.name, 0.0, ctx)
            .and_then(|id| self.recipe.at.apply(&mut self.host, id).map(|()| id));
        match built {
            Ok(id) => {
                self.target = Some(id);
                self.state = PartState::Building;
                info!(part = %self.recipe.name, "building");
                Ok(())
            }
            Err(e) => Err(self.fail(0, "base", e)),
        }
    }

    /// Applies one step to the part's solid.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::Frozen`] once the part is finalized,
    /// exported or failed, [`AssemblyError::InvalidTransition`] before
    /// [`Part::begin`], and [`AssemblyError::StepFailed`] if the step fails,
    /// which also moves the part to `Failed`.
    pub fn apply(&mut self, step: &Step, ctx: &BuildContext) -> Result<()> {
        let target = self.mutable_target()?;
        let index = self.steps_done + 1;
        match step.apply(&mut self.host, target, ctx) {
            Ok(()) => {
                self.steps_done = index;
                debug!(
                    part = %self.recipe.name,
                    step = index,
                    label = %step.label,
                    op = ?step.op,
                    "step applied"
                );
                Ok(())
            }
            Err(e) => Err(self.fail(index, &step.label, e)),
        }
    }

    /// Runs the whole recipe from `Draft` and leaves the part `Building`.
    ///
    /// # Errors
    ///
    /// Same as [`Part::begin`] and [`Part::apply`]; stops at the first
    /// failing step.
    pub fn build(&mut self, ctx: &BuildContext) -> Result<()> {
        self.begin(ctx)?;
        let steps = std::mem::take(&mut self.recipe.steps);
        let result = steps.iter().try_for_each(|step| self.apply(step, ctx));
        self.recipe.steps = steps;
        result
    }

    /// Freezes the part into a plain mesh and releases its solids.
    /// `Building → Finalized`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidTransition`] outside `Building`, or
    /// [`AssemblyError::StepFailed`] if the solid is not a single closed
    /// shell.
    pub fn finalize(&mut self) -> Result<&TriangleMesh> {
        self.expect_state(PartState::Building, PartState::Finalized)?;
        let index = self.steps_done + 1;
        let Some(target) = self.target else {
            return Err(self.fail(index, "finalize", BooleanError::EmptyResult.into()));
        };
        if !IsValid::new(target).execute(&self.host) {
            let reason = BooleanError::NonManifoldResult("final solid is not one closed shell".into());
            return Err(self.fail(index, "finalize", reason.into()));
        }
        let mesh = match TessellateSolid::new(target).execute(&self.host) {
            Ok(mesh) => mesh,
            Err(e) => return Err(self.fail(index, "finalize", e)),
        };
        self.host.clear();
        self.target = None;
        self.state = PartState::Finalized;
        info!(
            part = %self.recipe.name,
            triangles = mesh.triangle_count(),
            "finalized"
        );
        Ok(self.output.insert(mesh))
    }

    /// Hands the finished mesh to `sink` under `dir`. `Finalized → Exported`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidTransition`] outside `Finalized`, or
    /// [`AssemblyError::StepFailed`] wrapping the sink's error or
    /// [`AssemblyError::MissingOutput`] when there is no mesh to hand over.
    pub fn export(&mut self, sink: &mut impl ExportSink, dir: &Path) -> Result<()> {
        self.expect_state(PartState::Finalized, PartState::Exported)?;
        let path = dir.join(&self.recipe.file_name);
        let Some(mesh) = &self.output else {
            let missing = AssemblyError::MissingOutput {
                part: self.recipe.name.clone(),
            };
            return Err(self.fail(self.steps_done + 1, "export", missing.into()));
        };
        let exported = sink.export(&self.recipe.name, mesh, self.recipe.scale, &path);
        match exported {
            Ok(()) => {
                self.state = PartState::Exported;
                info!(part = %self.recipe.name, path = %path.display(), "exported");
                Ok(())
            }
            Err(e) => Err(self.fail(self.steps_done + 1, "export", e)),
        }
    }

    fn expect_state(&self, from: PartState, to: PartState) -> Result<()> {
        if self.state == from {
            Ok(())
        } else {
            Err(AssemblyError::InvalidTransition {
                part: self.recipe.name.clone(),
                from: self.state.name(),
                to: to.name(),
            }
            .into())
        }
    }

    fn mutable_target(&self) -> Result<SolidId> {
        match (self.state, self.target) {
            (PartState::Building, Some(target)) => Ok(target),
            (PartState::Draft, _) | (PartState::Building, None) => {
                Err(AssemblyError::InvalidTransition {
                    part: self.recipe.name.clone(),
                    from: self.state.name(),
                    to: PartState::Building.name(),
                }
                .into())
            }
            (state, _) => Err(AssemblyError::Frozen {
                part: self.recipe.name.clone(),
                state: state.name(),
            }
            .into()),
        }
    }

    /// Records a failure, drops every solid and moves to `Failed`.
    fn fail(&mut self, step: usize, label: &str, error: ForgeError) -> ForgeError {
        warn!(
            part = %self.recipe.name,
            step,
            label,
            kind = error.kind(),
            %error,
            "part failed"
        );
        self.failure = Some(PartFailure {
            step,
            label: label.to_owned(),
            kind: error.kind(),
            message: error.to_string(),
        });
        self.host.clear();
        self.target = None;
        self.output = None;
        self.state = PartState::Failed;
        AssemblyError::StepFailed {
            part: self.recipe.name.clone(),
            step,
            label: label.to_owned(),
            source: Box::new(error),
        }
        .into()
    }
}
