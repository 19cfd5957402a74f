use std::collections::HashMap;

use kurbo::{BezPath, CircleSegment, Shape};

use super::rings::ArcModel;
use super::ArcRenderer;
use crate::tree::arena::NodeKey;

/// Flattening tolerance (px) when converting arcs to Bézier paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Annular sector for an arc, or None if it would cover nothing.
pub fn arc_shape(arc: &ArcModel) -> Option<CircleSegment> {
    if !arc.is_visible() {
        return None;
    }
    Some(CircleSegment::new(
        arc.center,
        arc.outer_radius,
        arc.inner_radius,
        arc.start_angle,
        arc.sweep(),
    ))
}

/// Renderer that keeps a Bézier outline per visible arc.
#[derive(Debug)]
pub struct PathCollector {
    pub tolerance: f64,
    pub paths: Vec<(NodeKey, BezPath)>,
}

impl Default for PathCollector {
    fn default() -> Self {
        Self {
            tolerance: PATH_TOLERANCE,
            paths: Vec::new(),
        }
    }
}

impl PathCollector {
    /// SVG path data (`d` attribute) per node that drew anything.
    pub fn into_svg_map(self) -> HashMap<NodeKey, String> {
        self.paths
            .into_iter()
            .map(|(key, path)| (key, path.to_svg()))
            .collect()
    }
}

impl ArcRenderer for PathCollector {
    fn draw_arc(&mut self, arc: &ArcModel) {
        if let Some(segment) = arc_shape(arc) {
            self.paths
                .push((arc.id.clone(), segment.to_path(self.tolerance)));
        }
    }
}
