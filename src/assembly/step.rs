//! Recipe vocabulary: what a step builds, where it goes, and how it meets
//! the solid it is applied to.

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::host::{GeometryHost, Primitive};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::boolean::{Boolean, BooleanOp};
use crate::operations::profile::{GearProfile, ThreadProfile, ThreadShape};
use crate::operations::repair::repair_mesh;
use crate::operations::shaping::{HelicalSweep, LinearExtrude};
use crate::operations::transform::{Rotate, Translate};
use crate::topology::SolidId;

use super::config::ContactMargins;

/// Rigid placement of a freshly built tool: an optional rotation about an
/// axis through the origin, then a translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub translation: Vector3,
    pub rotation: Option<(Vector3, f64)>,
}

impl Placement {
    /// A pure translation.
    #[must_use]
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            rotation: None,
        }
    }

    /// Adds a rotation applied before the translation.
    #[must_use]
    pub fn rotated(mut self, axis: Vector3, angle: f64) -> Self {
        self.rotation = Some((axis, angle));
        self
    }

    /// Moves `solid` into place.
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation axis is zero or the solid is missing.
    pub fn apply(&self, host: &mut impl GeometryHost, solid: SolidId) -> Result<()> {
        if let Some((axis, angle)) = self.rotation {
            Rotate::new(solid, Point3::origin(), axis, angle).execute(host)?;
        }
        if self.translation != Vector3::zeros() {
            Translate::new(solid, self.translation).execute(host)?;
        }
        Ok(())
    }
}

/// How a tool meets the target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Contact {
    /// The tool crosses the target cleanly; no margin is applied.
    #[default]
    Free,
    /// A tool face is flush with a target face. The tool is moved by the
    /// margin along this world direction after placement.
    Shift(Vector3),
    /// The tool's ends are flush with the target's along the tool's local Z.
    /// A union tool is shortened by twice the overlap; a difference tool is
    /// lengthened by twice the clearance. Both stay centered.
    AxialEnds,
}

/// A screw thread tool: a tooth profile swept along +Z and closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadSpec {
    pub minor_radius: f64,
    pub major_radius: f64,
    pub pitch: f64,
    pub shape: ThreadShape,
    pub turns: f64,
    pub steps_per_turn: usize,
    /// Angle of the first profile copy.
    pub phase: f64,
    /// Axial position of the first profile copy.
    pub start: f64,
}

/// What a step builds before placing it.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSpec {
    Primitive(Primitive),
    /// A gear outline extruded from `z = 0` to `z = thickness`.
    Gear {
        teeth: usize,
        modulus: f64,
        thickness: f64,
    },
    Thread(ThreadSpec),
    /// A tool assembled from its own steps in local coordinates.
    Compound { base: Box<ToolSpec>, steps: Vec<Step> },
}

/// Settings shared by every step of one part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildContext {
    pub margins: ContactMargins,
    pub strict_repair: bool,
}

impl ToolSpec {
    /// Builds the tool in local coordinates and registers it with `host`.
    ///
    /// `axial` lengthens (positive) or shortens (negative) the tool along its
    /// local Z while keeping it centered.
    ///
    /// # Errors
    ///
    /// Returns any profile, sweep, repair or boolean error raised while
    /// building, or [`OperationError::InvalidInput`] if `axial` is non-zero
    /// for a thread or compound tool.
    pub fn build(
        &self,
        host: &mut impl GeometryHost,
        name: &str,
        axial: f64,
        ctx: &BuildContext,
    ) -> Result<SolidId> {
        match self {
            Self::Primitive(primitive) => {
                let shape = if axial.abs() < TOLERANCE {
                    *primitive
                } else {
                    primitive.lengthened(axial)
                };
                host.create_primitive(name, &shape)
            }
            Self::Gear {
                teeth,
                modulus,
                thickness,
            } => {
                let profile = GearProfile::new(*teeth, *modulus).execute()?;
                let mut mesh = LinearExtrude::new(&profile, thickness + axial).execute()?;
                if axial.abs() >= TOLERANCE {
                    let drop = Vector3::new(0.0, 0.0, -axial / 2.0);
                    for v in &mut mesh.vertices {
                        *v += drop;
                    }
                }
                host.create_from_mesh(name, mesh)
            }
            Self::Thread(thread) => {
                if axial.abs() >= TOLERANCE {
                    return Err(OperationError::InvalidInput(format!(
                        "{name}: thread tools cannot take an axial margin"
                    ))
                    .into());
                }
                build_thread(host, name, thread, ctx)
            }
            Self::Compound { base, steps } => {
                if axial.abs() >= TOLERANCE {
                    return Err(OperationError::InvalidInput(format!(
                        "{name}: compound tools cannot take an axial margin"
                    ))
                    .into());
                }
                let solid = base.build(host, name, 0.0, ctx)?;
                for step in steps {
                    step.apply(host, solid, ctx)?;
                }
                Ok(solid)
            }
        }
    }
}

fn build_thread(
    host: &mut impl GeometryHost,
    name: &str,
    thread: &ThreadSpec,
    ctx: &BuildContext,
) -> Result<SolidId> {
    let profile = ThreadProfile::new(thread.minor_radius, thread.major_radius, thread.pitch)
        .with_shape(thread.shape)
        .execute()?;
    let mut ribbon = HelicalSweep::new(
        &profile,
        Vector3::z(),
        thread.pitch,
        thread.turns,
        thread.steps_per_turn,
    )
    .with_phase(thread.phase)
    .execute()?;
    for v in &mut ribbon.vertices {
        v.z += thread.start;
    }

    let mut report = repair_mesh(ribbon)?;
    if ctx.strict_repair && !report.flags.is_empty() {
        return Err(report.flags.swap_remove(0).into());
    }
    debug!(
        tool = name,
        triangles = report.mesh.triangles.len(),
        loops_capped = report.loops_capped,
        "thread tool closed"
    );
    host.create_from_mesh(name, report.mesh)
}

/// One boolean step of a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub label: String,
    pub op: BooleanOp,
    pub tool: ToolSpec,
    pub at: Placement,
    pub contact: Contact,
}

impl Step {
    /// Creates a step with a free contact at the origin.
    #[must_use]
    pub fn new(label: impl Into<String>, op: BooleanOp, tool: ToolSpec) -> Self {
        Self {
            label: label.into(),
            op,
            tool,
            at: Placement::default(),
            contact: Contact::Free,
        }
    }

    /// Sets where the tool is placed.
    #[must_use]
    pub fn at(mut self, at: Placement) -> Self {
        self.at = at;
        self
    }

    /// Sets how the tool meets the target.
    #[must_use]
    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }

    /// Builds the tool, places it, applies the contact margin and runs the
    /// boolean against `target`. The tool is consumed.
    ///
    /// # Errors
    ///
    /// Returns any error from building the tool or running the boolean, and
    /// [`OperationError::InvalidInput`] for a zero shift direction.
    pub fn apply(
        &self,
        host: &mut impl GeometryHost,
        target: SolidId,
        ctx: &BuildContext,
    ) -> Result<()> {
        let margin = ctx.margins.margin(self.op);
        let axial = match (self.contact, self.op) {
            (Contact::AxialEnds, BooleanOp::Difference) => 2.0 * margin,
            (Contact::AxialEnds, _) => -2.0 * margin,
            _ => 0.0,
        };

        let tool = self.tool.build(host, &self.label, axial, ctx)?;
        self.at.apply(host, tool)?;
        if let Contact::Shift(direction) = self.contact {
            let unit = direction.try_normalize(TOLERANCE).ok_or_else(|| {
                OperationError::InvalidInput(format!("{}: shift direction is zero", self.label))
            })?;
            Translate::new(tool, unit * margin).execute(host)?;
        }
        Boolean::new(target, tool, self.op).execute(host)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::error::{BooleanError, ForgeError};
    use crate::operations::query::{shell_count, BoundingBox, IsValid, Volume};
    use crate::topology::SolidStore;

    fn ctx() -> BuildContext {
        BuildContext {
            margins: ContactMargins::default(),
            strict_repair: true,
        }
    }

    #[test]
    fn thread_cuts_a_single_shell_worm() {
        let mut store = SolidStore::new();
        let rod = store
            .create_primitive("rod", &Primitive::cylinder(0.006, 0.02, 64))
            .unwrap();
        Placement::at(0.0, 0.0, 0.01).apply(&mut store, rod).unwrap();
        let before = Volume::new(rod).execute(&store).unwrap();

        let pitch = PI * 0.001;
        let cut = Step::new(
            "worm_thread",
            BooleanOp::Difference,
            ToolSpec::Thread(ThreadSpec {
                minor_radius: 0.00375,
                major_radius: 0.007,
                pitch,
                shape: ThreadShape::Trapezoid,
                turns: 8.0,
                steps_per_turn: 32,
                phase: 0.0,
                start: -pitch - pitch / 64.0,
            }),
        );
        cut.apply(&mut store, rod, &ctx()).unwrap();

        assert_eq!(store.len(), 1);
        assert!(IsValid::new(rod).execute(&store));
        assert_eq!(shell_count(store.solid(rod).unwrap().mesh()), 1);
        let after = Volume::new(rod).execute(&store).unwrap();
        assert!(after < before);
        // The core inside the thread root is untouched.
        assert!(after > PI * 0.0037 * 0.0037 * 0.02);
    }

    #[test]
    fn axial_ends_shortens_union_tools() {
        let mut store = SolidStore::new();
        let rod = ToolSpec::Primitive(Primitive::cylinder(0.001, 0.03, 16));
        let id = rod.build(&mut store, "rod", -0.0004, &ctx()).unwrap();
        let aabb = BoundingBox::new(id).execute(&store).unwrap();
        assert!((aabb.max.z - 0.0148).abs() < 1e-12);
        assert!((aabb.min.z + 0.0148).abs() < 1e-12);
    }

    #[test]
    fn axial_ends_keeps_gears_centered() {
        let mut store = SolidStore::new();
        let gear = ToolSpec::Gear {
            teeth: 12,
            modulus: 0.001,
            thickness: 0.004,
        };
        let id = gear.build(&mut store, "gear", 0.0004, &ctx()).unwrap();
        let aabb = BoundingBox::new(id).execute(&store).unwrap();
        assert!((aabb.min.z + 0.0002).abs() < 1e-12);
        assert!((aabb.max.z - 0.0042).abs() < 1e-12);
    }

    #[test]
    fn thread_tool_is_closed() {
        let mut store = SolidStore::new();
        let thread = ThreadSpec {
            minor_radius: 0.004,
            major_radius: 0.006,
            pitch: 0.002,
            shape: ThreadShape::Trapezoid,
            turns: 2.0,
            steps_per_turn: 16,
            phase: 0.0,
            start: -0.001,
        };
        let id = ToolSpec::Thread(thread)
            .build(&mut store, "thread", 0.0, &ctx())
            .unwrap();
        assert!(store.solid(id).unwrap().is_manifold());
        assert!(Volume::new(id).execute(&store).unwrap() > 0.0);

        let result = ToolSpec::Thread(thread).build(&mut store, "thread", 0.001, &ctx());
        assert!(matches!(
            result,
            Err(ForgeError::Operation(OperationError::InvalidInput(_)))
        ));
    }

    #[test]
    fn flush_union_with_shift_merges() {
        let mut store = SolidStore::new();
        let base = store
            .create_primitive("base", &Primitive::cuboid(0.02, 0.02, 0.004))
            .unwrap();
        // Block sits exactly on the base's top face.
        let step = Step::new(
            "block",
            BooleanOp::Union,
            ToolSpec::Primitive(Primitive::cuboid(0.008, 0.006, 0.004)),
        )
        .at(Placement::at(0.003, 0.0015, 0.004))
        .contact(Contact::Shift(-Vector3::z()));
        step.apply(&mut store, base, &ctx()).unwrap();

        let volume = Volume::new(base).execute(&store).unwrap();
        // The block sinks 0.0002 into the base.
        let expected = 0.02 * 0.02 * 0.004 + 0.008 * 0.006 * 0.0038;
        assert!((volume - expected).abs() < 1e-12);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn flush_union_without_margin_is_refused() {
        let mut store = SolidStore::new();
        let base = store
            .create_primitive("base", &Primitive::cuboid(0.02, 0.02, 0.004))
            .unwrap();
        let step = Step::new(
            "block",
            BooleanOp::Union,
            ToolSpec::Primitive(Primitive::cuboid(0.008, 0.006, 0.004)),
        )
        .at(Placement::at(0.003, 0.0015, 0.004));
        assert!(matches!(
            step.apply(&mut store, base, &ctx()),
            Err(ForgeError::Boolean(BooleanError::CoincidentGeometry(_)))
        ));
    }

    #[test]
    fn zero_shift_is_rejected() {
        let mut store = SolidStore::new();
        let base = store
            .create_primitive("base", &Primitive::cuboid(1.0, 1.0, 1.0))
            .unwrap();
        let step = Step::new(
            "nudge",
            BooleanOp::Union,
            ToolSpec::Primitive(Primitive::cuboid(0.5, 0.5, 0.5)),
        )
        .contact(Contact::Shift(Vector3::zeros()));
        assert!(matches!(
            step.apply(&mut store, base, &ctx()),
            Err(ForgeError::Operation(OperationError::InvalidInput(_)))
        ));
    }
}
