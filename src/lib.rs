// Public library interface for sunburst-rs
// The binaries drive the same pipeline: records -> tree -> angles -> arcs

pub mod chart;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod tree;
pub mod ui;

pub use chart::{layout_pass, LayoutPass, SunburstChart};
pub use config::ChartOptions;
pub use error::{Result, SunburstError};
