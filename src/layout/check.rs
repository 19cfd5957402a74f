use std::f64::consts::TAU;
use std::fmt;

use super::angular::{metric_total, LayoutConfig};
use crate::tree::arena::{NodeId, NodeKey, NodeTree};

/// A broken layout invariant, found by `check_layout`.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutViolation {
    /// Root is not at depth 0 spanning the full circle from 0
    RootGeometry { key: NodeKey },
    /// Children's raw widths don't add up to the parent's span
    AngleSum { parent: NodeKey, expected: f64, actual: f64 },
    /// A child doesn't start where the previous sibling ended
    Gap { child: NodeKey, expected: f64, actual: f64 },
    /// A child is not exactly one ring below its parent
    Depth { child: NodeKey, parent_depth: u32, depth: u32 },
    /// Returned max depth disagrees with the deepest reachable node
    MaxDepth { reported: u32, actual: u32 },
}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutViolation::RootGeometry { key } => {
                write!(f, "root '{}' does not span the full circle", key)
            }
            LayoutViolation::AngleSum { parent, expected, actual } => write!(
                f,
                "children of '{}' sum to {:.9} rad, expected {:.9}",
                parent, actual, expected
            ),
            LayoutViolation::Gap { child, expected, actual } => write!(
                f,
                "'{}' starts at {:.9} rad, expected {:.9}",
                child, actual, expected
            ),
            LayoutViolation::Depth { child, parent_depth, depth } => write!(
                f,
                "'{}' at depth {} under a parent at depth {}",
                child, depth, parent_depth
            ),
            LayoutViolation::MaxDepth { reported, actual } => {
                write!(f, "max depth reported {} but deepest node is {}", reported, actual)
            }
        }
    }
}

/// Verify conservation, contiguity, root and depth invariants for the
/// subtree under `tree.root`, as laid out with `config`.
pub fn check_layout(
    tree: &NodeTree,
    max_depth: u32,
    config: &LayoutConfig,
    tolerance: f64,
) -> Vec<LayoutViolation> {
    let mut violations = Vec::new();
    let root = tree.get(tree.root);
    if root.depth != 0 || root.offset_radians != 0.0 || (root.radians - TAU).abs() > tolerance {
        violations.push(LayoutViolation::RootGeometry {
            key: root.key.clone(),
        });
    }

    let mut deepest = 0;
    let mut stack: Vec<NodeId> = vec![tree.root];
    while let Some(id) = stack.pop() {
        let node = tree.get(id);
        deepest = deepest.max(node.depth);
        if node.children.is_empty() {
            continue;
        }

        let mut expected_offset = node.offset_radians;
        let mut sum = 0.0;
        for &child_id in &node.children {
            let child = tree.get(child_id);
            if (child.offset_radians - expected_offset).abs() > tolerance {
                violations.push(LayoutViolation::Gap {
                    child: child.key.clone(),
                    expected: expected_offset,
                    actual: child.offset_radians,
                });
            }
            if child.depth != node.depth + 1 {
                violations.push(LayoutViolation::Depth {
                    child: child.key.clone(),
                    parent_depth: node.depth,
                    depth: child.depth,
                });
            }
            expected_offset = child.offset_radians + child.raw_radians;
            sum += child.raw_radians;
            stack.push(child_id);
        }

        // A metric that sums to zero leaves every child at zero.
        let degenerate = config
            .scale_by_metric
            .as_deref()
            .is_some_and(|metric| metric_total(&tree.nodes, id, metric).is_none());
        if !degenerate && (sum - node.radians).abs() > tolerance {
            violations.push(LayoutViolation::AngleSum {
                parent: node.key.clone(),
                expected: node.radians,
                actual: sum,
            });
        }
    }

    if deepest != max_depth {
        violations.push(LayoutViolation::MaxDepth {
            reported: max_depth,
            actual: deepest,
        });
    }

    violations
}
