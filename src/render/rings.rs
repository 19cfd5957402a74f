use std::f64::consts::FRAC_PI_2;

use compact_str::CompactString;
use kurbo::{Point, Rect};
use serde::Serialize;

use crate::tree::arena::{NodeId, NodeKey, SunburstNode};

/// Upper bound on visible rings, however deep the tree is.
pub const MAX_RINGS: u16 = 7;
/// Nodes deeper than this keep their angle but get no radius.
pub const MAX_NODE_DEPTH: u16 = 5;
/// Twelve o'clock.
pub const DEFAULT_ROTATION: f64 = -FRAC_PI_2;

/// Rendering-time ring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingConfig {
    /// Added to every arc's offset
    pub rotation: f64,
    pub max_rings: u16,
    pub max_node_depth: u16,
    /// Subtracted from the drawable size before computing the radius
    pub arc_border_width: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            rotation: DEFAULT_ROTATION,
            max_rings: MAX_RINGS,
            max_node_depth: MAX_NODE_DEPTH,
            arc_border_width: 2.0,
        }
    }
}

/// Drawable arc for one node: angles in screen radians, radii in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcModel {
    #[serde(skip)]
    pub node: NodeId,
    pub id: NodeKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<CompactString>,
    pub center: Point,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub depth: u32,
    pub value: f64,
    pub is_leaf: bool,
}

impl ArcModel {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether the arc covers any area at all.
    pub fn is_visible(&self) -> bool {
        self.sweep() > 0.0 && self.outer_radius > self.inner_radius
    }
}

/// Ring sizing for one pass, derived from the chart area and the tree depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub center: Point,
    /// Outer radius of the whole chart
    pub radius: f64,
    /// Thickness of a single ring
    pub radius_step: f64,
    pub num_rings: u32,
    config: RingConfig,
}

impl RingGeometry {
    pub fn new(chart_area: Rect, max_depth: u32, config: &RingConfig) -> Self {
        let available = chart_area.width().min(chart_area.height()) - config.arc_border_width;
        let radius = (available / 2.0).max(0.0);
        let num_rings = u32::from(config.max_rings)
            .min(max_depth.saturating_add(1))
            .max(1);

        RingGeometry {
            center: chart_area.center(),
            radius,
            radius_step: radius / num_rings as f64,
            num_rings,
            config: *config,
        }
    }

    /// Map a node's layout to an arc.
    ///
    /// A top-level record (no parent) never draws. A promoted root (depth 0)
    /// keeps its angles but no outer radius, leaving the middle empty.
    pub fn arc_for(&self, id: NodeId, node: &SunburstNode) -> ArcModel {
        let mut arc = ArcModel {
            node: id,
            id: node.key.clone(),
            label: node.label.clone(),
            center: self.center,
            start_angle: 0.0,
            end_angle: 0.0,
            inner_radius: 0.0,
            outer_radius: 0.0,
            depth: node.depth,
            value: node.value,
            is_leaf: node.is_leaf,
        };

        if node.parent_key.is_some() {
            arc.start_angle = self.config.rotation + node.offset_radians;
            arc.end_angle = arc.start_angle + node.radians;
            if node.depth <= u32::from(self.config.max_node_depth) {
                arc.inner_radius = node.depth as f64 * self.radius_step;
                arc.outer_radius = arc.inner_radius + self.radius_step;
            }
        }

        if node.depth == 0 {
            arc.outer_radius = 0.0;
        }

        arc
    }
}
