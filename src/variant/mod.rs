//! Normalized variant evidence.
//!
//! Every source of genetic evidence (structured records submitted with
//! the request, or raw variant-call text) is converted into the same
//! [`VariantRecord`] type before anything downstream sees it. There is
//! one record per gene; absence of a record means no evidence was
//! presented for that gene.

pub mod extract;

use crate::error::AnalysisError;
use crate::ontology::Pharmacogene;
use serde::{Deserialize, Serialize};

pub use extract::VariantExtractor;

/// One gene's observed genotype for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub gene: Pharmacogene,
    /// Two star-allele designators separated by `/`, e.g. `*1/*4`.
    pub diplotype: String,
    /// Representative marker identifier (rsID), when known.
    pub marker_id: Option<String>,
}

impl VariantRecord {
    /// The homozygous-reference record substituted when no evidence was
    /// presented for a required gene.
    pub fn reference(gene: Pharmacogene) -> Self {
        Self {
            gene,
            diplotype: "*1/*1".to_string(),
            marker_id: None,
        }
    }
}

/// A structured variant record as submitted by the caller. The gene is
/// case-normalized and validated on conversion; diplotype and marker id
/// pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInput {
    pub gene: String,
    pub diplotype: String,
    #[serde(default)]
    pub marker_id: Option<String>,
}

impl VariantInput {
    /// Validate and convert into the normalized record type.
    pub fn into_record(self) -> Result<VariantRecord, AnalysisError> {
        let gene = Pharmacogene::from_str(&self.gene).ok_or(AnalysisError::UnsupportedGene {
            gene: self.gene.clone(),
        })?;
        Ok(VariantRecord {
            gene,
            diplotype: self.diplotype,
            marker_id: self.marker_id,
        })
    }
}

/// Convert a batch of structured inputs, rejecting the whole batch on
/// the first unsupported gene.
pub fn records_from_structured(
    variants: Vec<VariantInput>,
) -> Result<Vec<VariantRecord>, AnalysisError> {
    variants.into_iter().map(VariantInput::into_record).collect()
}

/// Variant evidence for one analysis request.
///
/// Structured input takes precedence over raw text when both are
/// present; neither present yields empty evidence, which is valid.
pub fn extract_evidence(
    extractor: &VariantExtractor,
    variants: Option<Vec<VariantInput>>,
    raw_text: Option<&str>,
) -> Result<Vec<VariantRecord>, AnalysisError> {
    if let Some(variants) = variants {
        return records_from_structured(variants);
    }
    if let Some(text) = raw_text {
        return Ok(extractor.decode(text));
    }
    Ok(Vec::new())
}
