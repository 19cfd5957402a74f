use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Index into the arena `Vec<SunburstNode>`. Uses u32 to save memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// External record identifier. Numeric and string ids from the input are
/// normalised to the same textual key, so `1` and `"1"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeKey(CompactString);

impl NodeKey {
    pub fn new(key: impl Into<CompactString>) -> Self {
        NodeKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Hash as the plain str so lookups by `&str` through `Borrow` agree.
impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        NodeKey(CompactString::new(key))
    }
}

impl From<String> for NodeKey {
    fn from(key: String) -> Self {
        NodeKey(CompactString::from(key))
    }
}

impl From<i64> for NodeKey {
    fn from(key: i64) -> Self {
        NodeKey(key.to_compact_string())
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawKey {
            Int(i64),
            Float(f64),
            Text(CompactString),
        }

        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Int(n) => NodeKey::from(n),
            RawKey::Float(n) => NodeKey(n.to_compact_string()),
            RawKey::Text(s) => NodeKey(s),
        })
    }
}

/// A single node of the sunburst, stored in a flat arena.
#[derive(Debug, Clone)]
pub struct SunburstNode {
    /// Record id
    pub key: NodeKey,
    /// Parent record id (None for top-level records and unresolved placeholders)
    pub parent_key: Option<NodeKey>,
    /// Optional display label carried through from the record
    pub label: Option<CompactString>,
    pub value: f64,
    /// Extra numeric record fields, addressable as scaling metrics
    pub metrics: HashMap<CompactString, f64>,
    /// Child indices in record order (re-sorted when scaling by a metric)
    pub children: Vec<NodeId>,
    /// Ring index from the current root (root = 0)
    pub depth: u32,
    /// Start angle of the arc
    pub offset_radians: f64,
    /// Angular span after the minimum-angle collapse (0 if collapsed)
    pub radians: f64,
    /// Angular span before collapse; offsets of later siblings accumulate this
    pub raw_radians: f64,
    pub is_leaf: bool,
    /// False while the node only exists because a child referenced it
    pub has_record: bool,
}

impl SunburstNode {
    /// Placeholder created on first reference.
    fn placeholder(key: NodeKey) -> Self {
        SunburstNode {
            key,
            parent_key: None,
            label: None,
            value: 0.0,
            metrics: HashMap::new(),
            children: Vec::new(),
            depth: 0,
            offset_radians: 0.0,
            radians: 0.0,
            raw_radians: 0.0,
            is_leaf: false,
            has_record: false,
        }
    }

    /// Read a scaling metric. `"value"` is the record value; anything else is
    /// looked up among the extra numeric fields, defaulting to 0.
    pub fn metric(&self, name: &str) -> f64 {
        if name == "value" {
            return self.value;
        }
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    pub fn is_collapsed(&self) -> bool {
        self.radians == 0.0 && self.raw_radians > 0.0
    }
}

/// Arena of nodes plus an id → index map with get-or-insert semantics.
#[derive(Debug, Default)]
pub struct NodeMap {
    /// All nodes in contiguous memory
    pub nodes: Vec<SunburstNode>,
    index: HashMap<NodeKey, NodeId>,
}

impl NodeMap {
    pub fn with_capacity(capacity: usize) -> Self {
        NodeMap {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Fetch the node for `key`, materialising a placeholder if it has not
    /// been referenced yet.
    pub fn get_or_insert(&mut self, key: &NodeKey) -> NodeId {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SunburstNode::placeholder(key.clone()));
        self.index.insert(key.clone(), id);
        id
    }

    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: NodeId) -> &SunburstNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SunburstNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of tree construction for one layout pass.
#[derive(Debug)]
pub struct NodeTree {
    pub nodes: NodeMap,
    /// Effective root (natural root or override)
    pub root: NodeId,
    /// Node of each input record, in input order. Rendering walks this.
    pub record_order: Vec<NodeId>,
}

impl NodeTree {
    pub fn get(&self, id: NodeId) -> &SunburstNode {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SunburstNode {
        self.nodes.get_mut(id)
    }

    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.nodes.lookup(key)
    }

    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        &self.nodes.get(parent).children
    }

    /// Parent node, resolved through the parent key.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .parent_key
            .as_ref()
            .and_then(|key| self.lookup(key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_reuses_existing_nodes() {
        let mut map = NodeMap::default();
        let a = map.get_or_insert(&NodeKey::from("a"));
        let b = map.get_or_insert(&NodeKey::from("b"));
        assert_ne!(a, b);
        assert_eq!(map.get_or_insert(&NodeKey::from("a")), a);
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup("b"), Some(b));
        assert_eq!(map.lookup("c"), None);
    }

    #[test]
    fn placeholder_starts_with_zero_geometry() {
        let mut map = NodeMap::default();
        let id = map.get_or_insert(&NodeKey::from(7_i64));
        let node = map.get(id);
        assert_eq!(node.key.as_str(), "7");
        assert!(node.children.is_empty());
        assert_eq!(node.depth, 0);
        assert_eq!(node.offset_radians, 0.0);
        assert_eq!(node.radians, 0.0);
        assert!(!node.has_record);
    }

    #[test]
    fn numeric_and_string_keys_normalise_to_the_same_key() {
        let from_num: NodeKey = serde_json::from_str("12").unwrap();
        let from_str: NodeKey = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(from_num, from_str);
    }

    #[test]
    fn metric_value_reads_record_value() {
        let mut map = NodeMap::default();
        let id = map.get_or_insert(&NodeKey::from("x"));
        let node = map.get_mut(id);
        node.value = 3.0;
        node.metrics.insert("size".into(), 9.0);
        assert_eq!(node.metric("value"), 3.0);
        assert_eq!(node.metric("size"), 9.0);
        assert_eq!(node.metric("missing"), 0.0);
    }
}
