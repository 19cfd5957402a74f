mod angular;
mod check;

pub use angular::{compute_layout, LayoutConfig, MIN_RADIANS};
pub use check::{check_layout, LayoutViolation};
