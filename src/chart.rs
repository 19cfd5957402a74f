use kurbo::Rect;

use crate::config::ChartOptions;
use crate::error::Result;
use crate::layout::{self, LayoutConfig};
use crate::render::rings::{ArcModel, RingGeometry};
use crate::render::{self, ArcRenderer};
use crate::tree::arena::{NodeKey, NodeTree};
use crate::tree::record::{Dataset, Record};
use crate::tree;
use crate::ui::navigation::{InputAction, NavigationState};

/// Geometry produced by one build + layout pass.
#[derive(Debug)]
pub struct LayoutPass {
    pub tree: NodeTree,
    /// Deepest depth below the pass root; drives the ring count
    pub max_depth: u32,
}

/// Rebuild the tree from scratch and lay it out. Nothing carries over from
/// earlier passes.
pub fn layout_pass(
    records: &[Record],
    root_override: Option<&NodeKey>,
    config: &LayoutConfig,
) -> Result<LayoutPass> {
    let mut tree = tree::build_tree(records, root_override)?;
    let max_depth = layout::compute_layout(&mut tree, config);
    Ok(LayoutPass { tree, max_depth })
}

/// A sunburst over one dataset: the records, the options and the last good
/// layout. Interaction changes the root override and re-runs the pipeline.
pub struct SunburstChart {
    records: Vec<Record>,
    pub options: ChartOptions,
    pub navigation: NavigationState,
    pass: Option<LayoutPass>,
}

impl SunburstChart {
    pub fn new(records: Vec<Record>, options: ChartOptions) -> Self {
        Self {
            records,
            navigation: NavigationState::new(options.root_id.clone()),
            options,
            pass: None,
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(dataset.data, dataset.options)
    }

    /// Size arcs by `metric` (None splits evenly). Takes effect on the next
    /// `update`.
    pub fn set_scale_by_metric(&mut self, metric: Option<&str>) {
        self.options.scale_by_metric = metric.map(Into::into);
    }

    /// Last successful pass, if any.
    pub fn pass(&self) -> Option<&LayoutPass> {
        self.pass.as_ref()
    }

    /// Run a full pass with the current root override. On failure the
    /// previous pass stays in place.
    pub fn update(&mut self) -> Result<&LayoutPass> {
        let root_override = self.navigation.root_override.clone();
        tracing::info!(
            "Layout pass: {} records, root={:?}, metric={:?}",
            self.records.len(),
            root_override,
            self.options.scale_by_metric
        );

        match layout_pass(
            &self.records,
            root_override.as_ref(),
            &self.options.layout_config(),
        ) {
            Ok(pass) => {
                tracing::info!(
                    "Layout pass done: {} nodes, max_depth={}",
                    pass.tree.len(),
                    pass.max_depth
                );
                self.options.root_id = root_override;
                Ok(&*self.pass.insert(pass))
            }
            Err(e) => {
                tracing::warn!("Layout pass failed, keeping previous geometry: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a navigation action and re-run the pass if the root moved.
    /// Returns whether a new layout was produced. A failed pass rolls the
    /// navigation back so it keeps matching the geometry on screen.
    pub fn handle(&mut self, action: InputAction) -> Result<bool> {
        let Some(pass) = &self.pass else {
            tracing::debug!("Ignoring {:?}: no layout yet", action);
            return Ok(false);
        };

        let previous = self.navigation.clone();
        if !self.navigation.apply(action, &pass.tree) {
            return Ok(false);
        }

        if let Err(e) = self.update() {
            self.navigation = previous;
            return Err(e);
        }
        Ok(true)
    }

    /// Arcs for the current pass, in record order.
    pub fn arcs(&self, chart_area: Rect) -> Vec<ArcModel> {
        let mut arcs = Vec::with_capacity(self.records.len());
        self.render(chart_area, &mut arcs);
        arcs
    }

    /// Hand the current pass to a renderer. None before the first pass.
    pub fn render(&self, chart_area: Rect, renderer: &mut impl ArcRenderer) -> Option<RingGeometry> {
        let pass = self.pass.as_ref()?;
        Some(render::render_arcs(
            &pass.tree,
            chart_area,
            pass.max_depth,
            &self.options.ring_config(),
            renderer,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SunburstError;

    fn records() -> Vec<Record> {
        vec![
            Record::new("1", None, 0.0),
            Record::new("2", Some("1".into()), 3.0),
            Record::new("3", Some("1".into()), 1.0),
            Record::new("4", Some("2".into()), 1.0),
        ]
    }

    #[test]
    fn failed_update_keeps_previous_pass() {
        let mut chart = SunburstChart::new(records(), ChartOptions::default());
        chart.update().unwrap();

        chart.navigation.root_override = Some(NodeKey::from("gone"));
        assert_eq!(
            chart.update().unwrap_err(),
            SunburstError::UnknownRootOverride(NodeKey::from("gone"))
        );
        let pass = chart.pass().unwrap();
        assert_eq!(pass.tree.get(pass.tree.root).key.as_str(), "1");
        assert_eq!(chart.options.root_id, None);
    }

    #[test]
    fn drill_down_relayouts_from_clicked_node() {
        let mut chart = SunburstChart::new(records(), ChartOptions::default());
        chart.update().unwrap();
        let two = chart.pass().unwrap().tree.lookup("2").unwrap();

        assert!(chart.handle(InputAction::Select { node: two }).unwrap());
        let pass = chart.pass().unwrap();
        let root = pass.tree.get(pass.tree.root);
        assert_eq!(root.key.as_str(), "2");
        assert_eq!(pass.max_depth, 1);
        assert_eq!(chart.options.root_id, Some(NodeKey::from("2")));

        assert!(chart.handle(InputAction::Outside).unwrap());
        let pass = chart.pass().unwrap();
        assert_eq!(pass.tree.get(pass.tree.root).key.as_str(), "1");
    }

    #[test]
    fn handle_before_first_pass_is_a_no_op() {
        let mut chart = SunburstChart::new(records(), ChartOptions::default());
        assert!(!chart.handle(InputAction::Home).unwrap());
        assert!(chart.arcs(Rect::new(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn arcs_cover_every_record() {
        let mut chart = SunburstChart::new(records(), ChartOptions::default());
        chart.set_scale_by_metric(Some("value"));
        chart.update().unwrap();
        let arcs = chart.arcs(Rect::new(0.0, 0.0, 400.0, 400.0));
        assert_eq!(arcs.len(), 4);
        assert!(arcs.iter().filter(|a| a.is_visible()).all(|a| a.depth >= 1));
    }
}
