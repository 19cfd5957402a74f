use super::arena::{NodeId, NodeKey, NodeTree};

/// Summary of the subtree under the current root, after layout.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStats {
    /// Nodes reachable from the root (root included)
    pub reachable: usize,
    pub leaves: usize,
    /// Reachable nodes whose arc collapsed below the minimum angle
    pub collapsed: usize,
    pub max_depth: u32,
    /// Sum of leaf values
    pub total_value: f64,
}

/// Walk the subtree under `root` and tally it.
pub fn compute_stats(tree: &NodeTree, root: NodeId) -> TreeStats {
    let mut stats = TreeStats::default();

    let mut stack = vec![root];
    while let Some(node_id) = stack.pop() {
        let node = tree.get(node_id);
        stats.reachable += 1;
        stats.max_depth = stats.max_depth.max(node.depth);

        if node.is_collapsed() {
            stats.collapsed += 1;
        }
        if node.children.is_empty() {
            stats.leaves += 1;
            stats.total_value += node.value;
        }

        stack.extend(node.children.iter().copied());
    }

    stats
}

/// Keys from the top-level ancestor down to `node_id` (breadcrumb order).
pub fn build_path(tree: &NodeTree, node_id: NodeId) -> Vec<NodeKey> {
    let mut parts = Vec::new();
    let mut current = Some(node_id);

    while let Some(id) = current {
        parts.push(tree.get(id).key.clone());
        current = tree.parent(id);
        // A malformed cycle would loop forever; stop once every node was visited.
        if parts.len() > tree.len() {
            break;
        }
    }

    parts.reverse();
    parts
}

/// Breadcrumb string, preferring labels over raw ids.
pub fn format_path(tree: &NodeTree, node_id: NodeId) -> String {
    build_path(tree, node_id)
        .iter()
        .map(|key| {
            tree.lookup(key.as_str())
                .and_then(|id| tree.get(id).label.as_ref())
                .map(|label| label.to_string())
                .unwrap_or_else(|| key.to_string())
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::tree::build_tree;
    use crate::tree::record::Record;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("root", None, 0.0).with_label("Root"),
            Record::new("a", Some("root".into()), 3.0),
            Record::new("b", Some("root".into()), 0.0).with_label("Bee"),
            Record::new("b1", Some("b".into()), 4.0),
            Record::new("b2", Some("b".into()), 5.0),
        ]
    }

    #[test]
    fn stats_cover_reachable_subtree() {
        let mut tree = build_tree(&sample(), None).unwrap();
        compute_layout(&mut tree, &LayoutConfig::default());
        let stats = compute_stats(&tree, tree.root);
        assert_eq!(stats.reachable, 5);
        assert_eq!(stats.leaves, 3);
        assert_eq!(stats.collapsed, 0);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.total_value, 12.0);
    }

    #[test]
    fn breadcrumb_walks_up_to_top_level() {
        let tree = build_tree(&sample(), None).unwrap();
        let b2 = tree.lookup("b2").unwrap();
        let keys: Vec<_> = build_path(&tree, b2)
            .into_iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, ["root", "b", "b2"]);
        assert_eq!(format_path(&tree, b2), "Root / Bee / b2");
    }
}
