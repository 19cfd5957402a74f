/// Diagnostic tool to verify the records → tree → angles → arcs pipeline
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kurbo::Rect;

use sunburst_rs::layout::{check_layout, LayoutConfig};
use sunburst_rs::render::rings::{ArcModel, RingGeometry};
use sunburst_rs::tree::arena::NodeKey;
use sunburst_rs::tree::record::Dataset;
use sunburst_rs::tree::{self, stats};

#[derive(Parser, Debug)]
#[command(name = "debug-layout")]
struct Args {
    /// Dataset JSON file
    dataset: PathBuf,

    /// Root override (drill-down target)
    #[arg(long)]
    root: Option<String>,

    /// Scale arcs by this metric
    #[arg(long)]
    metric: Option<String>,

    /// Rows to show in the top-arcs table
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sunburst_rs=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    println!("=== DIAGNOSTIC: Records → Tree → Layout Pipeline ===");
    println!("Dataset: {}", args.dataset.display());

    // Load
    let file = File::open(&args.dataset)
        .with_context(|| format!("opening {}", args.dataset.display()))?;
    let dataset = Dataset::from_reader(BufReader::new(file))?;
    let parentless = dataset.data.iter().filter(|r| r.parent_id.is_none()).count();
    println!(
        "\n[1] Loaded {} records ({} without parent)",
        dataset.data.len(),
        parentless
    );

    // Build tree
    let root_override = args
        .root
        .as_deref()
        .map(NodeKey::from)
        .or_else(|| dataset.options.root_id.clone());
    let mut tree = tree::build_tree(&dataset.data, root_override.as_ref())?;
    let placeholders = tree.nodes.nodes.iter().filter(|n| !n.has_record).count();
    println!(
        "\n[2] Tree built: {} nodes ({} placeholders), root '{}'",
        tree.len(),
        placeholders,
        stats::format_path(&tree, tree.root)
    );

    // Layout
    let config = LayoutConfig {
        scale_by_metric: args
            .metric
            .as_deref()
            .map(Into::into)
            .or_else(|| dataset.options.scale_by_metric.clone()),
        min_radians: dataset.options.min_radians,
    };
    let max_depth = sunburst_rs::layout::compute_layout(&mut tree, &config);
    let summary = stats::compute_stats(&tree, tree.root);
    println!(
        "\n[3] Layout computed: max_depth={}, reachable={}, leaves={}, collapsed={}, leaf total={:.2}",
        max_depth, summary.reachable, summary.leaves, summary.collapsed, summary.total_value
    );

    // Arcs
    let area = Rect::new(0.0, 0.0, 800.0, 800.0);
    let geometry = RingGeometry::new(area, max_depth, &dataset.options.ring_config());
    println!(
        "\n[4] Rings: {} of {:.1}px (radius {:.1}px)",
        geometry.num_rings, geometry.radius_step, geometry.radius
    );

    let mut arcs: Vec<ArcModel> = tree
        .record_order
        .iter()
        .map(|&id| geometry.arc_for(id, tree.get(id)))
        .filter(|arc| arc.is_visible())
        .collect();
    arcs.sort_by(|a, b| b.sweep().total_cmp(&a.sweep()));

    println!("\n[5] Top {} visible arcs by sweep:", args.top);
    for (i, arc) in arcs.iter().take(args.top).enumerate() {
        println!(
            "    [{}] '{}' depth={} sweep={:.2}° r={:.1}..{:.1} value={} leaf={}",
            i,
            arc.label.as_deref().unwrap_or(arc.id.as_str()),
            arc.depth,
            arc.sweep().to_degrees(),
            arc.inner_radius,
            arc.outer_radius,
            arc.value,
            arc.is_leaf
        );
    }

    // Check for anomalies
    println!("\n[6] Checking layout invariants:");
    let violations = check_layout(&tree, max_depth, &config, 1e-9);
    if violations.is_empty() {
        println!("    ✓ angle conservation, contiguity, depth and root invariants hold");
    } else {
        for v in violations.iter().take(10) {
            println!("    ✗ {}", v);
        }
        if violations.len() > 10 {
            println!("    ... ({} more)", violations.len() - 10);
        }
    }

    Ok(())
}
