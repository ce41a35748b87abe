//! Raw variant-call text decoding.
//!
//! Decodes tab-delimited variant-call records (VCF-like data lines) into
//! per-gene diplotype evidence. The decoder is deliberately lenient:
//! malformed lines are skipped, never fatal, and a gene with marker
//! evidence but no qualifying star alleles still reports homozygous
//! reference.

use super::VariantRecord;
use crate::ontology::{MarkerTable, Pharmacogene, ALL_GENES};
use crate::phenotype::REFERENCE_ALLELE;
use std::collections::HashMap;
use tracing::debug;

/// Annotation key naming the record's gene.
const GENE_KEY: &str = "GENE";
/// Annotation key naming the record's star allele.
const STAR_KEY: &str = "STAR";
/// Minimum tab-delimited fields a record line must carry.
const MIN_FIELDS: usize = 10;

/// Decodes raw variant-call text into [`VariantRecord`]s.
#[derive(Debug)]
pub struct VariantExtractor {
    markers: MarkerTable,
}

/// Evidence accumulated for one gene across record lines.
#[derive(Debug, Default)]
struct GeneEvidence {
    /// Encountered marker identifiers, first one is representative.
    markers: Vec<String>,
    /// Non-reference star designators, one entry per called allele.
    star_calls: Vec<String>,
}

impl VariantExtractor {
    pub fn new(markers: MarkerTable) -> Self {
        Self { markers }
    }

    pub fn with_defaults() -> Self {
        Self::new(MarkerTable::with_defaults())
    }

    /// Decode raw variant-call text into one record per evidenced gene,
    /// in stable gene order.
    pub fn decode(&self, text: &str) -> Vec<VariantRecord> {
        let mut evidence: HashMap<Pharmacogene, GeneEvidence> = HashMap::new();

        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.decode_line(line, &mut evidence);
        }

        ALL_GENES
            .iter()
            .filter_map(|gene| {
                let acc = evidence.remove(gene)?;
                if acc.markers.is_empty() && acc.star_calls.is_empty() {
                    return None;
                }
                Some(VariantRecord {
                    gene: *gene,
                    diplotype: resolve_diplotype(&acc.star_calls),
                    marker_id: acc.markers.first().cloned(),
                })
            })
            .collect()
    }

    fn decode_line(&self, line: &str, evidence: &mut HashMap<Pharmacogene, GeneEvidence>) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            debug!(fields = fields.len(), "skipping short variant record");
            return;
        }

        let marker_id = fields[2];
        let info = parse_annotations(fields[7]);
        let calls = parse_calls(fields[8], fields[9]);

        let gene = match info.get(GENE_KEY) {
            Some(symbol) => Pharmacogene::from_str(symbol),
            None => self.markers.gene_of(marker_id),
        };
        let Some(gene) = gene else {
            debug!(marker_id, "skipping record with undeterminable gene");
            return;
        };

        let star = info.get(STAR_KEY).and_then(|raw| normalize_star(raw));
        let called = called_allele_count(calls.get("GT").copied());

        let acc = evidence.entry(gene).or_default();
        if !marker_id.is_empty() && marker_id != "." && !acc.markers.iter().any(|m| m == marker_id)
        {
            acc.markers.push(marker_id.to_string());
        }
        if let Some(star) = star {
            for _ in 0..called {
                acc.star_calls.push(star.clone());
            }
        }
    }
}

/// Parse a `;`-delimited `key=value` annotation block.
fn parse_annotations(block: &str) -> HashMap<&str, &str> {
    block
        .split(';')
        .filter_map(|entry| entry.split_once('='))
        .collect()
}

/// Pair `:`-delimited format keys with sample values, truncated to the
/// shorter of the two lists.
fn parse_calls<'a>(format: &'a str, sample: &'a str) -> HashMap<&'a str, &'a str> {
    format.split(':').zip(sample.split(':')).collect()
}

/// Normalize a star-allele designator: leading `*`, uppercase. The
/// reference allele contributes nothing.
fn normalize_star(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_uppercase();
    let star = if upper.starts_with('*') {
        upper
    } else {
        format!("*{upper}")
    };
    if star == REFERENCE_ALLELE {
        None
    } else {
        Some(star)
    }
}

/// Count the non-zero numeric allele calls of a genotype string
/// (separators `/` or `|`). Non-numeric tokens do not count.
fn called_allele_count(genotype: Option<&str>) -> usize {
    let Some(genotype) = genotype else { return 0 };
    genotype
        .split(['/', '|'])
        .filter(|token| token.parse::<u32>().map(|n| n != 0).unwrap_or(false))
        .count()
}

/// Resolve the final diplotype from accumulated non-reference calls.
fn resolve_diplotype(star_calls: &[String]) -> String {
    match star_calls {
        [] => format!("{REFERENCE_ALLELE}/{REFERENCE_ALLELE}"),
        [only] => format!("{REFERENCE_ALLELE}/{only}"),
        [first, second, ..] => format!("{first}/{second}"),
    }
}
