//! Extended drug-gene relationship loading.
//!
//! Reads the bundled gene-drug relationship dataset (tab-delimited, one
//! association per row) and distills it into a drug -> gene mapping.
//! Only rows whose relation is in the accepted set and whose gene is one
//! of the six supported pharmacogenes contribute.

use crate::ontology::Pharmacogene;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Relations that establish a drug-gene mapping.
const VALID_RELATIONS: [&str; 4] = ["associated", "metabolizes", "affects", "influences"];

const GENE_COLUMN: &str = "Entity1_name";
const DRUG_COLUMN: &str = "Entity2_name";
const RELATION_COLUMN: &str = "Association";

/// Load the extended drug -> gene mapping from a relationship dataset.
pub fn load_extended_map(path: &Path) -> Result<HashMap<String, Pharmacogene>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read relationship dataset: {}", path.display()))?;
    parse_relationships(&content)
}

/// Parse relationship rows into a drug -> gene mapping.
fn parse_relationships(content: &str) -> Result<HashMap<String, Pharmacogene>> {
    let mut lines = content.lines();

    let header = lines.next().context("Empty relationship dataset")?;
    let columns: Vec<&str> = header.split('\t').map(|s| s.trim()).collect();

    let gene_idx = columns
        .iter()
        .position(|&c| c == GENE_COLUMN)
        .with_context(|| format!("Missing {GENE_COLUMN} column"))?;
    let drug_idx = columns
        .iter()
        .position(|&c| c == DRUG_COLUMN)
        .with_context(|| format!("Missing {DRUG_COLUMN} column"))?;
    let relation_idx = columns
        .iter()
        .position(|&c| c == RELATION_COLUMN)
        .with_context(|| format!("Missing {RELATION_COLUMN} column"))?;

    let width = gene_idx.max(drug_idx).max(relation_idx) + 1;
    let mut mapping = HashMap::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split('\t').map(|s| s.trim()).collect();
        if values.len() < width {
            continue;
        }

        let drug = values[drug_idx].to_lowercase();
        if drug.is_empty() {
            continue;
        }
        let Some(gene) = Pharmacogene::from_str(values[gene_idx]) else {
            continue;
        };

        let relation = values[relation_idx].to_lowercase();
        if VALID_RELATIONS.contains(&relation.as_str()) {
            mapping.insert(drug, gene);
        }
    }

    Ok(mapping)
}
