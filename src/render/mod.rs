pub mod path;
pub mod rings;

use kurbo::Rect;

use crate::tree::arena::NodeTree;
use rings::{ArcModel, RingConfig, RingGeometry};

/// Anything that can turn a node's arc into something drawable.
///
/// The layout engine never draws; a renderer receives one `ArcModel` per
/// record and decides what to do with it.
pub trait ArcRenderer {
    fn draw_arc(&mut self, arc: &ArcModel);
}

impl ArcRenderer for Vec<ArcModel> {
    fn draw_arc(&mut self, arc: &ArcModel) {
        self.push(arc.clone());
    }
}

/// Feed every record's arc to `renderer`, in record order.
pub fn render_arcs(
    tree: &NodeTree,
    chart_area: Rect,
    max_depth: u32,
    config: &RingConfig,
    renderer: &mut impl ArcRenderer,
) -> RingGeometry {
    let geometry = RingGeometry::new(chart_area, max_depth, config);
    tracing::debug!(
        "Rendering {} arcs: radius={:.1}, rings={}, step={:.1}",
        tree.record_order.len(),
        geometry.radius,
        geometry.num_rings,
        geometry.radius_step
    );

    for &id in &tree.record_order {
        renderer.draw_arc(&geometry.arc_for(id, tree.get(id)));
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::tree::arena::NodeKey;
    use crate::tree::build_tree;
    use crate::tree::record::Record;

    #[test]
    fn arcs_follow_record_order() {
        let records = vec![
            Record::new("b", Some(NodeKey::from("r")), 1.0),
            Record::new("r", None, 0.0),
            Record::new("a", Some(NodeKey::from("r")), 3.0),
        ];
        let mut tree = build_tree(&records, None).unwrap();
        let max_depth = compute_layout(&mut tree, &LayoutConfig::scaled_by("value"));

        let mut arcs: Vec<ArcModel> = Vec::new();
        render_arcs(
            &tree,
            Rect::new(0.0, 0.0, 300.0, 300.0),
            max_depth,
            &RingConfig::default(),
            &mut arcs,
        );

        let ids: Vec<_> = arcs.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["b", "r", "a"]);
        assert_eq!(arcs.iter().filter(|a| a.is_visible()).count(), 2);
    }
}
