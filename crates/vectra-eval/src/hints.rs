//! Ghost vectors that illustrate vector sums and differences.

use vectra_types::ast::{BinOp, Expr, ExprKind};
use vectra_types::scene::{add3, sub3, ObjectId, SceneObject, Vec3, VectorObject, VisualizationMode};

/// Where a vector is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub start: Vec3,
    pub end: Vec3,
}

impl Placement {
    pub fn components(&self) -> Vec3 {
        sub3(self.end, self.start)
    }

    /// The same vector, moved so that it starts at `start`.
    fn translated_to(&self, start: Vec3) -> Placement {
        Placement {
            start,
            end: add3(start, self.components()),
        }
    }

    /// Reversed direction, same start.
    fn negated(&self) -> Placement {
        Placement {
            start: self.start,
            end: sub3(self.start, self.components()),
        }
    }
}

/// Produces the temporary objects of one pass. Ids are numbered in the
/// order ghosts are created.
pub struct HintGenerator {
    mode: VisualizationMode,
    color: String,
    next_id: usize,
}

impl HintGenerator {
    pub fn new(mode: VisualizationMode, color: impl Into<String>) -> Self {
        Self {
            mode,
            color: color.into(),
            next_id: 0,
        }
    }

    /// Ghosts for `rhs`, if it is `a + b` or `a - b` over two names that
    /// `locate` can place as vectors.
    pub fn hints_for(
        &mut self,
        rhs: &Expr,
        locate: impl Fn(&str) -> Option<Placement>,
    ) -> Vec<SceneObject> {
        if self.mode == VisualizationMode::None {
            return Vec::new();
        }
        let ExprKind::Binary { left, op, right } = &rhs.kind else {
            return Vec::new();
        };
        if !matches!(op, BinOp::Add | BinOp::Sub) {
            return Vec::new();
        }
        let (Some(a_name), Some(b_name)) = (left.as_identifier(), right.as_identifier()) else {
            return Vec::new();
        };
        let (Some(a), Some(b)) = (locate(a_name), locate(b_name)) else {
            return Vec::new();
        };
        let b = if *op == BinOp::Sub { b.negated() } else { b };

        let mut ghosts = vec![self.ghost(b_name, b.translated_to(a.end))];
        if self.mode == VisualizationMode::Parallelogram {
            // The far side starts where b would end if it were drawn from a's tail.
            let anchor = add3(a.start, b.components());
            ghosts.push(self.ghost(a_name, a.translated_to(anchor)));
        }
        ghosts
    }

    fn ghost(&mut self, of: &str, placement: Placement) -> SceneObject {
        let id = ObjectId::new(format!("ghost-{}", self.next_id));
        self.next_id += 1;
        let name = format!("{of}'");
        SceneObject::Vector(VectorObject::new(
            id,
            name,
            placement.start,
            placement.end,
            self.color.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectra_parser::parse_script;

    fn rhs(source: &str) -> Expr {
        let parsed = parse_script(source);
        parsed.lines[0].outcome.as_ref().unwrap().value().clone()
    }

    fn locate(name: &str) -> Option<Placement> {
        match name {
            "a" => Some(Placement {
                start: [0.0; 3],
                end: [1.0, 0.0, 0.0],
            }),
            "b" => Some(Placement {
                start: [0.0; 3],
                end: [0.0, 1.0, 0.0],
            }),
            _ => None,
        }
    }

    fn placement(obj: &SceneObject) -> (Vec3, Vec3) {
        let v = obj.as_vector().unwrap();
        (v.start(), v.end())
    }

    #[test]
    fn test_tip_to_tail_sum() {
        let mut gen = HintGenerator::new(VisualizationMode::TipToTail, "#888888");
        let ghosts = gen.hints_for(&rhs("c = a + b"), locate);
        assert_eq!(ghosts.len(), 1);
        assert_eq!(placement(&ghosts[0]), ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]));
        assert_eq!(ghosts[0].id().as_str(), "ghost-0");
        assert_eq!(ghosts[0].color(), "#888888");
    }

    #[test]
    fn test_difference_negates_right_operand() {
        let mut gen = HintGenerator::new(VisualizationMode::TipToTail, "#888888");
        let ghosts = gen.hints_for(&rhs("c = a - b"), locate);
        assert_eq!(placement(&ghosts[0]), ([1.0, 0.0, 0.0], [1.0, -1.0, 0.0]));
    }

    #[test]
    fn test_parallelogram_has_two_sides() {
        let mut gen = HintGenerator::new(VisualizationMode::Parallelogram, "#888888");
        let ghosts = gen.hints_for(&rhs("c = a + b"), locate);
        assert_eq!(ghosts.len(), 2);
        assert_eq!(placement(&ghosts[1]), ([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]));
        assert_eq!(ghosts[1].id().as_str(), "ghost-1");
    }

    #[test]
    fn test_parallelogram_closes_for_offset_operands() {
        let offset = |name: &str| match name {
            "a" => Some(Placement {
                start: [1.0, 1.0, 0.0],
                end: [3.0, 1.0, 0.0],
            }),
            "b" => Some(Placement {
                start: [5.0, 5.0, 0.0],
                end: [5.0, 6.0, 0.0],
            }),
            _ => None,
        };
        let mut gen = HintGenerator::new(VisualizationMode::Parallelogram, "#888888");
        let ghosts = gen.hints_for(&rhs("c = a + b"), offset);
        assert_eq!(placement(&ghosts[0]), ([3.0, 1.0, 0.0], [3.0, 2.0, 0.0]));
        assert_eq!(placement(&ghosts[1]), ([1.0, 2.0, 0.0], [3.0, 2.0, 0.0]));

        let ghosts = gen.hints_for(&rhs("c = a - b"), offset);
        assert_eq!(placement(&ghosts[0]), ([3.0, 1.0, 0.0], [3.0, 0.0, 0.0]));
        assert_eq!(placement(&ghosts[1]), ([1.0, 0.0, 0.0], [3.0, 0.0, 0.0]));
    }

    #[test]
    fn test_no_hints() {
        let mut gen = HintGenerator::new(VisualizationMode::TipToTail, "#888888");
        assert!(gen.hints_for(&rhs("c = a * b"), locate).is_empty());
        assert!(gen.hints_for(&rhs("c = a + x"), locate).is_empty());
        assert!(gen.hints_for(&rhs("c = a + [0, 1, 0]"), locate).is_empty());

        let mut off = HintGenerator::new(VisualizationMode::None, "#888888");
        assert!(off.hints_for(&rhs("c = a + b"), locate).is_empty());
    }
}
