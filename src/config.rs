use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::layout::{LayoutConfig, MIN_RADIANS};
use crate::render::rings::{RingConfig, DEFAULT_ROTATION, MAX_NODE_DEPTH, MAX_RINGS};
use crate::tree::arena::NodeKey;

/// Chart options as they appear next to the data in a dataset file.
///
/// `root_id` and `scale_by_metric` are the two knobs that change between
/// passes; the rest tune the ring geometry and rarely move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    /// Drill-down root; None lays out from the natural root
    pub root_id: Option<NodeKey>,
    /// Metric used to size sibling arcs; None splits evenly
    pub scale_by_metric: Option<CompactString>,
    /// Angle where the first arc starts (radians, -π/2 = twelve o'clock)
    pub rotation: f64,
    /// Arcs narrower than this collapse to zero width
    pub min_radians: f64,
    /// Upper bound on visible rings
    pub max_rings: u16,
    /// Deepest ring that still gets a radius
    pub max_node_depth: u16,
    /// Border width subtracted from the drawable size
    pub arc_border_width: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            root_id: None,
            scale_by_metric: None,
            rotation: DEFAULT_ROTATION,
            min_radians: MIN_RADIANS,
            max_rings: MAX_RINGS,
            max_node_depth: MAX_NODE_DEPTH,
            arc_border_width: 2.0,
        }
    }
}

impl ChartOptions {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            scale_by_metric: self.scale_by_metric.clone(),
            min_radians: self.min_radians,
        }
    }

    pub fn ring_config(&self) -> RingConfig {
        RingConfig {
            rotation: self.rotation,
            max_rings: self.max_rings,
            max_node_depth: self.max_node_depth,
            arc_border_width: self.arc_border_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_fall_back_to_defaults() {
        let opts: ChartOptions =
            serde_json::from_str(r#"{ "rootId": 4, "scaleByMetric": "size" }"#).unwrap();
        assert_eq!(opts.root_id, Some(NodeKey::from("4")));
        assert_eq!(opts.scale_by_metric.as_deref(), Some("size"));
        assert_eq!(opts.min_radians, MIN_RADIANS);
        assert_eq!(opts.max_rings, 7);
        assert_eq!(opts.max_node_depth, 5);
    }

    #[test]
    fn derived_configs_carry_the_options() {
        let opts = ChartOptions {
            min_radians: 0.1,
            rotation: 0.0,
            ..ChartOptions::default()
        };
        assert_eq!(opts.layout_config().min_radians, 0.1);
        assert_eq!(opts.ring_config().rotation, 0.0);
    }
}
