use crate::tree::arena::{NodeId, NodeKey, NodeTree};

/// Interaction the rendering layer reports after its own hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Click on a node's arc (or the centre, for the current root)
    Select { node: NodeId },
    /// Click outside every arc
    Outside,
    /// Back to the natural root
    Home,
}

/// Navigation state: which node the next pass lays out from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// None lays out from the natural (parentless) root
    pub root_override: Option<NodeKey>,
}

impl NavigationState {
    pub fn new(root_override: Option<NodeKey>) -> Self {
        Self { root_override }
    }

    /// Apply an action against the tree of the current pass.
    /// Returns true if the root changed and a new pass is needed.
    pub fn apply(&mut self, action: InputAction, tree: &NodeTree) -> bool {
        match action {
            InputAction::Select { node } => self.drill_down(node, tree),
            InputAction::Outside => self.navigate_up(tree),
            InputAction::Home => self.navigate_home(),
        }
    }

    /// Clicking the current root steps out to its parent; clicking a node
    /// with children drills into it; leaves do nothing.
    pub fn drill_down(&mut self, node: NodeId, tree: &NodeTree) -> bool {
        let target = tree.get(node);

        let next = if target.depth == 0 {
            target.parent_key.clone()
        } else if !target.children.is_empty() {
            Some(target.key.clone())
        } else {
            return false;
        };

        self.set_root(next)
    }

    /// Navigate up one level from the current override.
    pub fn navigate_up(&mut self, tree: &NodeTree) -> bool {
        let Some(current) = &self.root_override else {
            return false;
        };
        let parent = tree
            .lookup(current.as_str())
            .and_then(|id| tree.get(id).parent_key.clone());

        match parent {
            Some(parent) => self.set_root(Some(parent)),
            None => false,
        }
    }

    /// Navigate to the absolute root.
    pub fn navigate_home(&mut self) -> bool {
        self.set_root(None)
    }

    pub fn is_drilled(&self) -> bool {
        self.root_override.is_some()
    }

    fn set_root(&mut self, next: Option<NodeKey>) -> bool {
        if self.root_override == next {
            return false;
        }
        tracing::debug!("Root override: {:?} -> {:?}", self.root_override, next);
        self.root_override = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::tree::build_tree;
    use crate::tree::record::Record;

    fn records() -> Vec<Record> {
        vec![
            Record::new("top", None, 0.0),
            Record::new("mid", Some("top".into()), 0.0),
            Record::new("leaf", Some("mid".into()), 1.0),
            Record::new("other", Some("top".into()), 1.0),
        ]
    }

    fn pass(nav: &NavigationState) -> NodeTree {
        let mut tree = build_tree(&records(), nav.root_override.as_ref()).unwrap();
        compute_layout(&mut tree, &LayoutConfig::default());
        tree
    }

    #[test]
    fn select_branch_drills_in_and_leaf_is_ignored() {
        let mut nav = NavigationState::default();
        let tree = pass(&nav);

        let leaf = tree.lookup("other").unwrap();
        assert!(!nav.apply(InputAction::Select { node: leaf }, &tree));

        let mid = tree.lookup("mid").unwrap();
        assert!(nav.apply(InputAction::Select { node: mid }, &tree));
        assert_eq!(nav.root_override, Some(NodeKey::from("mid")));
    }

    #[test]
    fn selecting_current_root_steps_out() {
        let mut nav = NavigationState::new(Some(NodeKey::from("mid")));
        let tree = pass(&nav);
        assert!(nav.apply(InputAction::Select { node: tree.root }, &tree));
        assert_eq!(nav.root_override, Some(NodeKey::from("top")));

        // Stepping out of the top-level root clears the override; then there is nowhere to go.
        let tree = pass(&nav);
        assert!(nav.apply(InputAction::Select { node: tree.root }, &tree));
        assert_eq!(nav.root_override, None);
        let tree = pass(&nav);
        assert!(!nav.apply(InputAction::Select { node: tree.root }, &tree));
    }

    #[test]
    fn outside_click_ascends_until_top() {
        let mut nav = NavigationState::new(Some(NodeKey::from("mid")));
        let tree = pass(&nav);
        assert!(nav.apply(InputAction::Outside, &tree));
        assert_eq!(nav.root_override, Some(NodeKey::from("top")));

        let tree = pass(&nav);
        assert!(!nav.apply(InputAction::Outside, &tree));
        assert_eq!(nav.root_override, Some(NodeKey::from("top")));

        assert!(nav.apply(InputAction::Home, &tree));
        assert!(!nav.is_drilled());
    }
}
