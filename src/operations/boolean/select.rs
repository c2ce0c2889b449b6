use serde::{Deserialize, Serialize};

use super::classify::PointClassification;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

/// Which operand a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The solid being modified.
    Target,
    /// The solid consumed by the operation.
    Tool,
}

/// Decision about whether to keep a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    Keep,
    KeepFlipped,
    Discard,
}

/// Determines whether a fragment should be kept based on its classification
/// relative to the other operand and the boolean operation.
///
/// | Fragment    | vs other operand | Union   | Difference  | Intersection |
/// |-------------|------------------|---------|-------------|--------------|
/// | from target | OUTSIDE tool     | keep    | keep        | discard      |
/// | from target | INSIDE tool      | discard | discard     | keep         |
/// | from tool   | OUTSIDE target   | keep    | discard     | discard      |
/// | from tool   | INSIDE target    | discard | keep (flip) | keep         |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn should_keep_fragment(
    source: Operand,
    classification: PointClassification,
    op: BooleanOp,
) -> KeepDecision {
    use BooleanOp::{Difference, Intersection, Union};
    use PointClassification::{Inside, Outside};

    match (source, classification, op) {
        (Operand::Target, Outside, Union | Difference) => KeepDecision::Keep,
        (Operand::Target, Outside, Intersection) => KeepDecision::Discard,
        (Operand::Target, Inside, Union | Difference) => KeepDecision::Discard,
        (Operand::Target, Inside, Intersection) => KeepDecision::Keep,

        (Operand::Tool, Outside, Union) => KeepDecision::Keep,
        (Operand::Tool, Outside, Difference | Intersection) => KeepDecision::Discard,
        (Operand::Tool, Inside, Union) => KeepDecision::Discard,
        (Operand::Tool, Inside, Difference) => KeepDecision::KeepFlipped,
        (Operand::Tool, Inside, Intersection) => KeepDecision::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_keeps_outside_fragments() {
        for source in [Operand::Target, Operand::Tool] {
            assert_eq!(
                should_keep_fragment(source, PointClassification::Outside, BooleanOp::Union),
                KeepDecision::Keep
            );
            assert_eq!(
                should_keep_fragment(source, PointClassification::Inside, BooleanOp::Union),
                KeepDecision::Discard
            );
        }
    }

    #[test]
    fn difference_flips_tool_inside() {
        assert_eq!(
            should_keep_fragment(
                Operand::Tool,
                PointClassification::Inside,
                BooleanOp::Difference
            ),
            KeepDecision::KeepFlipped
        );
        assert_eq!(
            should_keep_fragment(
                Operand::Tool,
                PointClassification::Outside,
                BooleanOp::Difference
            ),
            KeepDecision::Discard
        );
        assert_eq!(
            should_keep_fragment(
                Operand::Target,
                PointClassification::Inside,
                BooleanOp::Difference
            ),
            KeepDecision::Discard
        );
    }

    #[test]
    fn intersection_keeps_inside_fragments() {
        for source in [Operand::Target, Operand::Tool] {
            assert_eq!(
                should_keep_fragment(source, PointClassification::Inside, BooleanOp::Intersection),
                KeepDecision::Keep
            );
            assert_eq!(
                should_keep_fragment(
                    source,
                    PointClassification::Outside,
                    BooleanOp::Intersection
                ),
                KeepDecision::Discard
            );
        }
    }
}
