//! Results persistence module

use anyhow::Result;
use crate::cluster::Core;
use crate::ensemble::Ensemble;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Save extraction results to the specified directory
pub fn save_results(cores: &[Core], ensemble: &Ensemble, output_dir: &str) -> Result<()> {
    log::info!("Saving {} cores to {}", cores.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    // Save summary information
    save_summary(cores, ensemble, output_dir)?;

    // Save each core
    save_cores(cores, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(cores: &[Core], ensemble: &Ensemble, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let universe = ensemble.node_universe().len();
    let clustered: usize = cores.iter().map(|c| c.size).sum();

    // Create summary object
    let summary = json!({
        "ensemble_stats": {
            "replicate_count": ensemble.len(),
            "node_count": universe,
        },
        "core_stats": {
            "core_count": cores.len(),
            "total_core_nodes": clustered,
            "unassigned_nodes": universe - clustered,
            "largest_core_size": cores.first().map_or(0, |c| c.size),
            "smallest_core_size": cores.last().map_or(0, |c| c.size),
            "avg_core_size": clustered as f64 /
                             if cores.is_empty() { 1.0 } else { cores.len() as f64 },
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual core information
fn save_cores(cores: &[Core], output_dir: &str) -> Result<()> {
    log::info!("Saving individual core information");

    // Create cores directory
    let cores_dir = Path::new(output_dir).join("cores");
    fs::create_dir_all(&cores_dir)?;

    // Create a JSON file for each core
    for core in cores {
        let path = cores_dir.join(format!("core_{}.json", core.id));
        let mut file = File::create(path)?;

        file.write_all(to_string_pretty(&core)?.as_bytes())?;
    }

    // Create a JSON file with all cores
    let all_cores_path = Path::new(output_dir).join("all_cores.json");
    let mut all_cores_file = File::create(all_cores_path)?;

    let cores_json = json!({
        "cores": cores.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "members": c.members,
            })
        }).collect::<Vec<_>>()
    });

    all_cores_file.write_all(to_string_pretty(&cores_json)?.as_bytes())?;

    Ok(())
}
