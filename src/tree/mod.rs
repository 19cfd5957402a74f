pub mod arena;
pub mod record;
pub mod stats;

use std::f64::consts::TAU;

use self::arena::{NodeId, NodeKey, NodeMap, NodeTree};
use self::record::Record;
use crate::error::{Result, SunburstError};

/// Build a NodeTree from the flat record list.
///
/// Parents may appear after their children: the first reference creates a
/// placeholder that the parent's own record later fills in. The effective
/// root is `root_override` when given, otherwise the parentless record. The
/// root is always reset to the full circle at depth 0, since an override may
/// name a node that sat deep in a previous pass.
///
/// Cycles (a record naming its own descendant as parent) are not detected.
pub fn build_tree(records: &[Record], root_override: Option<&NodeKey>) -> Result<NodeTree> {
    let mut nodes = NodeMap::with_capacity(records.len());
    let mut record_order = Vec::with_capacity(records.len());
    let mut natural_root: Option<NodeId> = None;

    for record in records {
        let id = nodes.get_or_insert(&record.id);
        if nodes.get(id).has_record {
            tracing::warn!("Duplicate record id '{}', later record wins", record.id);
        }

        {
            let node = nodes.get_mut(id);
            node.value = record.value;
            node.parent_key = record.parent_id.clone();
            node.label = record.label.clone();
            node.metrics = record.metrics.clone();
            node.has_record = true;
        }
        record_order.push(id);

        match &record.parent_id {
            Some(parent_key) => {
                let parent = nodes.get_or_insert(parent_key);
                nodes.get_mut(parent).children.push(id);
            }
            None => {
                if let Some(previous) = natural_root {
                    tracing::warn!(
                        "Multiple parentless records ('{}' and '{}'), using the later one as root",
                        nodes.get(previous).key,
                        record.id
                    );
                }
                natural_root = Some(id);
            }
        }
    }

    let placeholders = nodes.nodes.iter().filter(|n| !n.has_record).count();
    if placeholders > 0 {
        tracing::debug!("{} parent ids referenced without a record of their own", placeholders);
    }

    let root = match root_override {
        Some(key) => nodes
            .lookup(key.as_str())
            .ok_or_else(|| SunburstError::UnknownRootOverride(key.clone()))?,
        None => natural_root.ok_or(SunburstError::MissingRoot)?,
    };

    {
        let node = nodes.get_mut(root);
        node.offset_radians = 0.0;
        node.radians = TAU;
        node.raw_radians = TAU;
        node.depth = 0;
    }

    tracing::debug!(
        "Tree built: {} nodes from {} records, root='{}'",
        nodes.len(),
        records.len(),
        nodes.get(root).key
    );

    Ok(NodeTree {
        nodes,
        root,
        record_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, parent: Option<&str>, value: f64) -> Record {
        Record::new(id, parent.map(NodeKey::from), value)
    }

    #[test]
    fn links_children_in_record_order() {
        let records = vec![
            rec("1", None, 0.0),
            rec("2", Some("1"), 0.0),
            rec("3", Some("1"), 0.0),
        ];
        let tree = build_tree(&records, None).unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.key.as_str(), "1");
        let keys: Vec<_> = tree
            .children(tree.root)
            .iter()
            .map(|&c| tree.get(c).key.as_str())
            .collect();
        assert_eq!(keys, ["2", "3"]);
    }

    #[test]
    fn child_before_parent_fills_placeholder() {
        let records = vec![rec("b", Some("a"), 2.0), rec("a", None, 5.0)];
        let tree = build_tree(&records, None).unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.key.as_str(), "a");
        assert_eq!(root.value, 5.0);
        assert!(root.has_record);
        assert_eq!(tree.children(tree.root).len(), 1);
        assert_eq!(tree.record_order.len(), 2);
        assert_eq!(tree.get(tree.record_order[0]).key.as_str(), "b");
    }

    #[test]
    fn root_gets_full_circle() {
        let records = vec![rec("1", None, 0.0), rec("2", Some("1"), 0.0)];
        let tree = build_tree(&records, Some(&NodeKey::from("2"))).unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.key.as_str(), "2");
        assert_eq!(root.depth, 0);
        assert_eq!(root.offset_radians, 0.0);
        assert_eq!(root.radians, TAU);
    }

    #[test]
    fn missing_root_is_an_error() {
        let records = vec![rec("2", Some("1"), 0.0), rec("3", Some("2"), 0.0)];
        assert_eq!(
            build_tree(&records, None).unwrap_err(),
            SunburstError::MissingRoot
        );
    }

    #[test]
    fn override_may_name_a_placeholder() {
        // "1" never has a record but exists as the parent of "2".
        let records = vec![rec("2", Some("1"), 0.0)];
        let tree = build_tree(&records, Some(&NodeKey::from("1"))).unwrap();
        assert_eq!(tree.get(tree.root).key.as_str(), "1");
    }

    #[test]
    fn unknown_override_is_an_error() {
        let records = vec![rec("1", None, 0.0)];
        let err = build_tree(&records, Some(&NodeKey::from("nope"))).unwrap_err();
        assert_eq!(err, SunburstError::UnknownRootOverride(NodeKey::from("nope")));
    }

    #[test]
    fn last_parentless_record_wins() {
        let records = vec![rec("a", None, 0.0), rec("b", None, 0.0)];
        let tree = build_tree(&records, None).unwrap();
        assert_eq!(tree.get(tree.root).key.as_str(), "b");
    }
}
