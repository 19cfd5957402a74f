use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kurbo::Rect;
use serde::Serialize;

use sunburst_rs::render::path::PathCollector;
use sunburst_rs::render::rings::ArcModel;
use sunburst_rs::tree::arena::NodeKey;
use sunburst_rs::tree::record::Dataset;
use sunburst_rs::tree::stats;
use sunburst_rs::SunburstChart;

/// Lay out a flat parent-referencing dataset as a sunburst and print the arcs.
#[derive(Parser, Debug)]
#[command(name = "sunburst", version)]
struct Cli {
    /// Dataset JSON: { "data": [...], "options": {...} }
    dataset: PathBuf,

    /// Lay out from this node instead of the natural root
    #[arg(long)]
    root: Option<String>,

    /// Size sibling arcs by this metric ("value" or any numeric record field)
    #[arg(long)]
    metric: Option<String>,

    /// Collapse arcs narrower than this many radians
    #[arg(long)]
    min_radians: Option<f64>,

    /// Chart area as WIDTHxHEIGHT
    #[arg(long, default_value = "800x800", value_parser = parse_size)]
    size: (f64, f64),

    /// Attach SVG path data to every visible arc
    #[arg(long)]
    paths: bool,

    /// Only print arcs that cover any area
    #[arg(long)]
    visible_only: bool,
}

#[derive(Serialize)]
struct ArcOutput {
    #[serde(flatten)]
    arc: ArcModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOutput {
    root: NodeKey,
    drilled: bool,
    breadcrumb: String,
    max_depth: u32,
    num_rings: u32,
    radius: f64,
    arcs: Vec<ArcOutput>,
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
    if w < 0.0 || h < 0.0 {
        return Err(format!("size must not be negative, got {}x{}", w, h));
    }
    Ok((w, h))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sunburst_rs=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.dataset)
        .with_context(|| format!("opening dataset {}", cli.dataset.display()))?;
    let mut dataset = Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing dataset {}", cli.dataset.display()))?;

    // Flags win over the options stored with the data.
    if let Some(root) = &cli.root {
        dataset.options.root_id = Some(NodeKey::from(root.as_str()));
    }
    if let Some(min) = cli.min_radians {
        dataset.options.min_radians = min;
    }

    tracing::info!(
        "Loaded {} records from {}",
        dataset.data.len(),
        cli.dataset.display()
    );

    let mut chart = SunburstChart::from_dataset(dataset);
    if cli.metric.is_some() {
        chart.set_scale_by_metric(cli.metric.as_deref());
    }
    chart.update().context("layout failed")?;

    let (width, height) = cli.size;
    let area = Rect::new(0.0, 0.0, width, height);

    let mut arcs: Vec<ArcModel> = Vec::new();
    let geometry = chart
        .render(area, &mut arcs)
        .context("no layout to render")?;

    let mut svg_paths = HashMap::new();
    if cli.paths {
        let mut collector = PathCollector::default();
        chart.render(area, &mut collector);
        svg_paths = collector.into_svg_map();
    }

    let pass = chart.pass().context("no layout to render")?;
    let root = pass.tree.root;

    let output = LayoutOutput {
        root: pass.tree.get(root).key.clone(),
        drilled: chart.navigation.is_drilled(),
        breadcrumb: stats::format_path(&pass.tree, root),
        max_depth: pass.max_depth,
        num_rings: geometry.num_rings,
        radius: geometry.radius,
        arcs: arcs
            .into_iter()
            .filter(|arc| !cli.visible_only || arc.is_visible())
            .map(|arc| ArcOutput {
                path: svg_paths.remove(&arc.id),
                arc,
            })
            .collect(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &output)?;
    writeln!(out)?;

    Ok(())
}
