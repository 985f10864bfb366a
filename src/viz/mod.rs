//! Visualization export module
//!
//! Writes UpSet-style comparison data for the discovered cores against
//! the replicate partitions. Rendering itself is left to external tools;
//! this module only produces the data files and a static summary page.

use anyhow::Result;
use crate::cluster::Core;
use crate::ensemble::Ensemble;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Generate visualization artifacts from extraction results
pub fn generate_visualizations(
    cores: &[Core],
    ensemble: &Ensemble,
    sig: f64,
    output_dir: &str,
) -> Result<()> {
    log::info!("Generating visualizations for {} cores", cores.len());

    // Create visualizations directory
    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    generate_upset_data(cores, ensemble, &viz_dir)?;
    generate_html_summary(cores, ensemble, sig, &viz_dir)?;

    log::info!("Visualizations generated successfully");

    Ok(())
}

/// Write the core-by-replicate containment matrix for UpSet-style plotting
///
/// A cell is 1 when some module of that replicate contains the entire core.
fn generate_upset_data(cores: &[Core], ensemble: &Ensemble, viz_dir: &Path) -> Result<()> {
    log::info!("Generating UpSet membership data");

    let path = viz_dir.join("upset_membership.csv");
    let mut file = File::create(path)?;

    // Write header
    write!(file, "core_id,size,agreement")?;
    for i in 0..ensemble.len() {
        write!(file, ",replicate_{}", i)?;
    }
    writeln!(file)?;

    // One row per core
    for core in cores {
        let nodes = core.to_node_set();

        let contained: Vec<u8> = ensemble
            .partitions()
            .iter()
            .map(|p| u8::from(p.min_mismatch(&nodes) == 0))
            .collect();
        let agreement: usize = contained.iter().map(|&c| c as usize).sum();

        write!(file, "{},{},{}", core.id, core.size, agreement)?;
        for flag in contained {
            write!(file, ",{}", flag)?;
        }
        writeln!(file)?;
    }

    Ok(())
}

/// Generate a static HTML summary page
fn generate_html_summary(
    cores: &[Core],
    ensemble: &Ensemble,
    sig: f64,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating HTML summary");

    let index_path = viz_dir.join("index.html");
    let mut index_file = File::create(index_path)?;

    writeln!(index_file, "<!DOCTYPE html>")?;
    writeln!(index_file, "<html lang=\"en\">")?;
    writeln!(index_file, "<head>")?;
    writeln!(index_file, "  <meta charset=\"UTF-8\">")?;
    writeln!(index_file, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(index_file, "  <title>Significance Clustering Report</title>")?;
    writeln!(index_file, "  <style>")?;
    writeln!(index_file, "    body {{ font-family: Arial, sans-serif; margin: 20px; }}")?;
    writeln!(index_file, "    h1, h2 {{ color: #333; }}")?;
    writeln!(index_file, "    .core-list {{ display: flex; flex-wrap: wrap; }}")?;
    writeln!(index_file, "    .core-card {{ border: 1px solid #ddd; margin: 10px; padding: 15px; border-radius: 5px; width: 300px; }}")?;
    writeln!(index_file, "    .core-card h3 {{ margin-top: 0; }}")?;
    writeln!(index_file, "    .stats {{ margin-top: 20px; background-color: #f9f9f9; padding: 15px; border-radius: 5px; }}")?;
    writeln!(index_file, "  </style>")?;
    writeln!(index_file, "</head>")?;
    writeln!(index_file, "<body>")?;
    writeln!(index_file, "  <h1>Significance Clustering Report</h1>")?;

    // Write summary statistics
    writeln!(index_file, "  <div class=\"stats\">")?;
    writeln!(index_file, "    <h2>Summary Statistics</h2>")?;
    writeln!(index_file, "    <p>Replicates: {}</p>", ensemble.len())?;
    writeln!(index_file, "    <p>Significance Level: {}</p>", sig)?;
    writeln!(index_file, "    <p>Total Cores: {}</p>", cores.len())?;

    if !cores.is_empty() {
        let total_nodes: usize = cores.iter().map(|c| c.size).sum();
        let largest = cores.iter().map(|c| c.size).max().unwrap_or(0);
        let avg_size = total_nodes as f64 / cores.len() as f64;

        writeln!(index_file, "    <p>Total Core Nodes: {}</p>", total_nodes)?;
        writeln!(index_file, "    <p>Largest Core: {} nodes</p>", largest)?;
        writeln!(index_file, "    <p>Average Core Size: {:.2} nodes</p>", avg_size)?;
    }

    writeln!(index_file, "  </div>")?;

    // Write core list
    writeln!(index_file, "  <h2>Cores</h2>")?;
    writeln!(index_file, "  <div class=\"core-list\">")?;

    for core in cores {
        let nodes = core.to_node_set();
        let agreement = ensemble
            .partitions()
            .iter()
            .filter(|p| p.min_mismatch(&nodes) == 0)
            .count();

        writeln!(index_file, "    <div class=\"core-card\">")?;
        writeln!(index_file, "      <h3>Core {}</h3>", core.id)?;
        writeln!(index_file, "      <p>Size: {} nodes</p>", core.size)?;
        writeln!(index_file, "      <p>Intact in {} of {} replicates</p>", agreement, ensemble.len())?;
        writeln!(index_file, "    </div>")?;
    }

    writeln!(index_file, "  </div>")?;
    writeln!(index_file, "</body>")?;
    writeln!(index_file, "</html>")?;

    Ok(())
}
