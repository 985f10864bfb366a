//! JSON file handling for partition ensembles

use std::fs;

use anyhow::Result;
use log;

use crate::ensemble::{Ensemble, NodeId, NodeSet, Partition};

/// Load a partition ensemble from a nested JSON array
///
/// Layout: the outer array holds one entry per replicate run, each entry
/// is an array of modules, and each module is an array of node ids.
/// Example: `[[[0,1,2],[3,4]], [[0,1],[2,3,4]]]`.
pub fn load_ensemble(path: &str) -> Result<Ensemble> {
    log::info!("Reading ensemble file: {}", path);

    // Check if the file exists
    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let raw = fs::read_to_string(path)?;
    let replicates: Vec<Vec<Vec<NodeId>>> = serde_json::from_str(&raw)?;

    if replicates.is_empty() {
        return Err(anyhow::anyhow!("Ensemble file contains no partitions: {}", path));
    }

    let partitions: Vec<Partition> = replicates
        .into_iter()
        .map(|modules| {
            Partition::new(
                modules
                    .into_iter()
                    .map(|members| members.into_iter().collect::<NodeSet>())
                    .collect(),
            )
        })
        .collect();

    let ensemble = Ensemble::new(partitions);

    log::info!(
        "Loaded {} replicate partitions over {} nodes",
        ensemble.len(),
        ensemble.node_universe().len()
    );

    Ok(ensemble)
}
