use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{AssemblyError, Result};
use crate::export::ExportSink;

use super::config::AssemblyConfig;
use super::part::{Part, PartFailure, PartState, Recipe};
use super::recipes::catalog;

/// Where one part ended up after a build or export pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PartOutcome {
    pub name: String,
    pub state: PartState,
    pub failure: Option<PartFailure>,
}

/// Per-part outcomes, in registration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyReport {
    pub parts: Vec<PartOutcome>,
}

impl AssemblyReport {
    /// Parts that have not failed.
    pub fn succeeded(&self) -> impl Iterator<Item = &PartOutcome> {
        self.parts.iter().filter(|p| p.state != PartState::Failed)
    }

    /// Parts that failed, with the step that stopped them.
    pub fn failed(&self) -> impl Iterator<Item = &PartOutcome> {
        self.parts.iter().filter(|p| p.state == PartState::Failed)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Builds a set of independent parts.
///
/// Parts share nothing: each owns its own solid store, so they are built in
/// parallel while the steps inside one part run strictly in order. A failing
/// part never touches its siblings.
#[derive(Debug, Default)]
pub struct PartAssembler {
    config: AssemblyConfig,
    parts: Vec<Part>,
}

impl PartAssembler {
    #[must_use]
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            config,
            parts: Vec::new(),
        }
    }

    /// An assembler holding every part of the mechanism.
    #[must_use]
    pub fn with_catalog(config: AssemblyConfig) -> Self {
        Self {
            config,
            parts: catalog().into_iter().map(Part::new).collect(),
        }
    }

    /// Registers a recipe as a new `Draft` part.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::DuplicatePart`] if the name is taken.
    pub fn add(&mut self, recipe: Recipe) -> Result<()> {
        if self.part(&recipe.name).is_some() {
            return Err(AssemblyError::DuplicatePart(recipe.name).into());
        }
        self.parts.push(Part::new(recipe));
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name() == name)
    }

    /// Builds and finalizes every `Draft` part, one rayon task per part.
    ///
    /// Failures are recorded on the failing part and in the report; parts
    /// that are already past `Draft` are left alone.
    pub fn build_all(&mut self) -> AssemblyReport {
        let config = &self.config;
        self.parts
            .par_iter_mut()
            .filter(|part| part.state() == PartState::Draft)
            .for_each(|part| {
                let ctx = config.context_for(part.name());
                let built = part.build(&ctx).and_then(|()| part.finalize().map(|_| ()));
                if let Err(e) = built {
                    debug!(part = %part.name(), error = %e, "build aborted");
                }
            });

        let report = self.report();
        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "build pass finished"
        );
        report
    }

    /// Exports every `Finalized` part to `sink`, one at a time.
    ///
    /// A sink error fails only the part being exported.
    pub fn export_all(&mut self, sink: &mut impl ExportSink, dir: &Path) -> AssemblyReport {
        for part in &mut self.parts {
            if part.state() != PartState::Finalized {
                continue;
            }
            if let Err(e) = part.export(sink, dir) {
                debug!(part = %part.name(), error = %e, "export aborted");
            }
        }
        self.report()
    }

    /// The current state of every part.
    #[must_use]
    pub fn report(&self) -> AssemblyReport {
        AssemblyReport {
            parts: self
                .parts
                .iter()
                .map(|part| PartOutcome {
                    name: part.name().to_owned(),
                    state: part.state(),
                    failure: part.failure().cloned(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::assembly::recipes::pinion_wheel;
    use crate::assembly::step::{Contact, Placement, Step, ToolSpec};
    use crate::error::ForgeError;
    use crate::export::MemorySink;
    use crate::host::Primitive;
    use crate::math::Vector3;
    use crate::operations::boolean::BooleanOp;
    use crate::operations::query::shell_count;
    use crate::tessellation::TriangleMesh;
    use crate::topology::Mesh;

    /// Merges the per-face vertex copies of a flat-shaded mesh back into
    /// shared vertices.
    fn welded(mesh: &TriangleMesh) -> Mesh {
        let mut index: HashMap<[u64; 3], u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut triangles = Vec::with_capacity(mesh.indices.len());
        for tri in &mesh.indices {
            let mut welded_tri = [0; 3];
            for (k, &i) in tri.iter().enumerate() {
                let v = mesh.vertices[i as usize];
                let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
                welded_tri[k] = *index.entry(key).or_insert_with(|| {
                    vertices.push(v);
                    u32::try_from(vertices.len() - 1).unwrap()
                });
            }
            triangles.push(welded_tri);
        }
        Mesh::new(vertices, triangles)
    }

    /// Routes part logs to the test output; `RUST_LOG=debug` shows each step.
    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    fn stepped_block(name: &str) -> Recipe {
        Recipe {
            name: name.into(),
            base: ToolSpec::Primitive(Primitive::cuboid(0.02, 0.02, 0.004)),
            at: Placement::default(),
            steps: vec![Step::new(
                "riser",
                BooleanOp::Union,
                ToolSpec::Primitive(Primitive::cuboid(0.008, 0.006, 0.004)),
            )
            .at(Placement::at(0.003, 0.0015, 0.004))
            .contact(Contact::Shift(-Vector3::z()))],
            file_name: format!("{name}.stl"),
            scale: 1.0,
        }
    }

    fn broken_block(name: &str) -> Recipe {
        let mut recipe = stepped_block(name);
        // Flush with the riser's side and no margin.
        recipe.steps.push(
            Step::new(
                "side_cut",
                BooleanOp::Difference,
                ToolSpec::Primitive(Primitive::cuboid(0.002, 0.002, 0.02)),
            )
            .at(Placement::at(-0.002, 0.0013, 0.0)),
        );
        recipe
    }

    #[test]
    fn pinion_and_wheel_build_into_one_part() {
        init_logging();
        let mut assembler = PartAssembler::new(AssemblyConfig::default());
        assembler.add(pinion_wheel()).unwrap();
        let report = assembler.build_all();
        assert!(report.is_success());

        let part = assembler.part("2_Pinion_Wheel_Assembly").unwrap();
        assert_eq!(part.state(), PartState::Finalized);
        assert_eq!(part.steps_done(), 2);
        assert_eq!(part.live_solids(), 0);
        assert!(part.output().unwrap().triangle_count() > 0);
    }

    #[test]
    fn whole_catalog_builds_and_exports() {
        init_logging();
        let mut assembler = PartAssembler::with_catalog(AssemblyConfig::default());
        let report = assembler.build_all();
        let failed: Vec<_> = report.failed().collect();
        assert!(failed.is_empty(), "failed parts: {failed:?}");
        assert!(report
            .parts
            .iter()
            .all(|p| p.state == PartState::Finalized));

        let mut sink = MemorySink::new();
        let report = assembler.export_all(&mut sink, Path::new("stl"));
        assert!(report.parts.iter().all(|p| p.state == PartState::Exported));
        assert_eq!(sink.exports().len(), 6);
        for export in sink.exports() {
            let mesh = welded(&export.mesh);
            assert!(mesh.is_closed_manifold(), "{} is not closed", export.name);
            assert_eq!(shell_count(&mesh), 1, "{} has several shells", export.name);
        }
    }

    #[test]
    fn a_failing_part_does_not_stop_its_siblings() {
        init_logging();
        let mut assembler = PartAssembler::new(AssemblyConfig::default());
        assembler.add(stepped_block("Good_Block")).unwrap();
        assembler.add(broken_block("Bad_Block")).unwrap();
        assembler.add(stepped_block("Other_Block")).unwrap();

        let report = assembler.build_all();
        assert!(!report.is_success());
        assert_eq!(report.succeeded().count(), 2);
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "Bad_Block");
        let failure = failed[0].failure.as_ref().unwrap();
        assert_eq!(failure.step, 2);
        assert_eq!(failure.label, "side_cut");
        assert_eq!(failure.kind, "BooleanError");

        let mut sink = MemorySink::new();
        let report = assembler.export_all(&mut sink, Path::new("out"));
        assert_eq!(sink.exports().len(), 2);
        assert!(sink.get("Bad_Block").is_none());
        assert_eq!(
            sink.get("Good_Block").unwrap().path,
            Path::new("out/Good_Block.stl")
        );
        let states: Vec<_> = report.parts.iter().map(|p| p.state).collect();
        assert_eq!(
            states,
            [PartState::Exported, PartState::Failed, PartState::Exported]
        );
    }

    #[test]
    fn part_margins_come_from_config() {
        let config = AssemblyConfig::from_toml_str(
            "[parts.Tight_Block]\nunion_overlap = 0.0\n",
        )
        .unwrap();
        let mut assembler = PartAssembler::new(config);
        assembler.add(stepped_block("Loose_Block")).unwrap();
        assembler.add(stepped_block("Tight_Block")).unwrap();
        assembler.build_all();

        assert_eq!(
            assembler.part("Loose_Block").unwrap().state(),
            PartState::Finalized
        );
        let tight = assembler.part("Tight_Block").unwrap();
        assert_eq!(tight.state(), PartState::Failed);
        assert_eq!(tight.failure().unwrap().label, "riser");
    }

    #[test]
    fn second_build_pass_leaves_finished_parts_alone() {
        let mut assembler = PartAssembler::new(AssemblyConfig::default());
        assembler.add(stepped_block("Block")).unwrap();
        assembler.build_all();
        let before = assembler.part("Block").unwrap().output().cloned();
        let report = assembler.build_all();
        assert_eq!(report.parts[0].state, PartState::Finalized);
        assert_eq!(assembler.part("Block").unwrap().output().cloned(), before);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut assembler = PartAssembler::new(AssemblyConfig::default());
        assembler.add(stepped_block("Block")).unwrap();
        assert!(matches!(
            assembler.add(stepped_block("Block")),
            Err(ForgeError::Assembly(AssemblyError::DuplicatePart(_)))
        ));
        assert_eq!(assembler.parts().len(), 1);
    }

    #[test]
    fn catalog_registers_every_part_as_draft() {
        let assembler = PartAssembler::with_catalog(AssemblyConfig::default());
        assert_eq!(assembler.parts().len(), 6);
        assert!(assembler
            .parts()
            .iter()
            .all(|p| p.state() == PartState::Draft));
        assert!(assembler.config().strict_repair);
    }
}
