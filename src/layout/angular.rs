use std::f64::consts::PI;

use compact_str::CompactString;

use crate::tree::arena::{NodeId, NodeMap, NodeTree};

/// Half a degree. Arcs narrower than this are not drawn.
pub const MIN_RADIANS: f64 = PI / 360.0;

/// Configuration for the angular subdivision.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Size siblings by this metric (sorted largest first); None splits evenly
    pub scale_by_metric: Option<CompactString>,
    /// Collapse threshold for a single arc
    pub min_radians: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale_by_metric: None,
            min_radians: MIN_RADIANS,
        }
    }
}

impl LayoutConfig {
    pub fn scaled_by(metric: &str) -> Self {
        Self {
            scale_by_metric: Some(CompactString::new(metric)),
            ..Self::default()
        }
    }
}

/// Assign depth, offset and span to every node reachable from `tree.root`.
///
/// The root's own geometry (full circle, depth 0) is set by tree
/// construction. Returns the deepest depth reached.
///
/// Walks with an explicit stack, so parent chains of any length are fine.
pub fn compute_layout(tree: &mut NodeTree, config: &LayoutConfig) -> u32 {
    let root = tree.root;
    let mut max_depth = {
        let node = tree.nodes.get_mut(root);
        node.is_leaf = node.children.is_empty();
        node.depth
    };

    // Each node is subdivided once, which also ends malformed cycles.
    let mut visited = vec![false; tree.len()];
    visited[root.index()] = true;

    let mut stack: Vec<NodeId> = vec![root];
    while let Some(parent) = stack.pop() {
        for child in layout_children(&mut tree.nodes, parent, config) {
            let node = tree.nodes.get(child);
            max_depth = max_depth.max(node.depth);
            if !node.is_leaf && !visited[child.index()] {
                visited[child.index()] = true;
                stack.push(child);
            }
        }
    }

    tracing::debug!(
        "Angular layout done: root='{}', max_depth={}, metric={:?}",
        tree.get(root).key,
        max_depth,
        config.scale_by_metric
    );

    max_depth
}

/// Subdivide `parent`'s arc among its direct children and return them in
/// their final order.
fn layout_children(nodes: &mut NodeMap, parent: NodeId, config: &LayoutConfig) -> Vec<NodeId> {
    let (offset, radians, depth) = {
        let node = nodes.get(parent);
        (node.offset_radians, node.radians, node.depth)
    };

    if nodes.get(parent).children.is_empty() {
        return Vec::new();
    }

    // Detach the child list so the children themselves can be mutated.
    let mut children = std::mem::take(&mut nodes.get_mut(parent).children);

    let widths = match &config.scale_by_metric {
        Some(metric) => {
            let mut weighted: Vec<(NodeId, f64)> = children
                .iter()
                .map(|&id| (id, metric_weight(nodes.get(id).metric(metric))))
                .collect();
            let total: f64 = weighted.iter().map(|&(_, w)| w).sum();

            // Stable: equal weights keep record order.
            weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
            children = weighted.iter().map(|&(id, _)| id).collect();

            if is_usable_total(total) {
                weighted.iter().map(|&(_, w)| radians * w / total).collect()
            } else {
                tracing::debug!(
                    "Metric '{}' sums to zero under '{}', children collapse",
                    metric,
                    nodes.get(parent).key
                );
                vec![0.0; children.len()]
            }
        }
        None => vec![radians / children.len() as f64; children.len()],
    };

    let mut accumulated = 0.0;
    for (&child, &raw) in children.iter().zip(&widths) {
        let node = nodes.get_mut(child);
        node.offset_radians = offset + accumulated;
        node.raw_radians = raw;
        node.radians = effective_radians(raw, config.min_radians);
        node.depth = depth + 1;
        node.is_leaf = node.children.is_empty();

        // Siblings advance by the raw width so a collapse doesn't shift them.
        accumulated += raw;
    }

    nodes.get_mut(parent).children = children.clone();
    children
}

/// Total metric weight of `parent`'s children, or None when the metric
/// cannot split the arc (zero or non-finite sum).
pub(crate) fn metric_total(nodes: &NodeMap, parent: NodeId, metric: &str) -> Option<f64> {
    let total: f64 = nodes
        .get(parent)
        .children
        .iter()
        .map(|&id| metric_weight(nodes.get(id).metric(metric)))
        .sum();
    is_usable_total(total).then_some(total)
}

fn is_usable_total(total: f64) -> bool {
    total > 0.0 && total.is_finite()
}

/// Negative, NaN and infinite metric values weigh nothing.
fn metric_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn effective_radians(raw: f64, min_radians: f64) -> f64 {
    if raw < min_radians {
        0.0
    } else {
        raw
    }
}
