//! Natural-language explanation generation.
//!
//! The real generator is an external text-generation service; this
//! module defines its interface boundary, the deterministic local
//! template used when it fails, and an outcome type that keeps the
//! generated-vs-degraded distinction explicit so tests can assert on
//! degradation instead of a silently swallowed fault.

use crate::guideline::RiskLabel;
use crate::ontology::Pharmacogene;
use crate::phenotype::Phenotype;
use serde::{Deserialize, Serialize, Serializer};

/// A patient-facing explanation of one drug result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub mechanism: String,
}

/// Interface to the external explanation generator.
///
/// Implementations must bound their own latency (the pipeline
/// configuration carries the timeout budget); any failure is caught by
/// the orchestrator and replaced with the local template, never
/// surfaced to the caller.
pub trait ExplanationProvider: Send + Sync {
    fn generate(
        &self,
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
        risk: RiskLabel,
    ) -> anyhow::Result<Explanation>;
}

/// Deterministic local explanation template.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    /// Render the templated explanation for the four decision inputs.
    pub fn render(
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
        risk: RiskLabel,
    ) -> Explanation {
        Explanation {
            summary: format!("{gene} {phenotype} may affect response to {drug}."),
            mechanism: format!(
                "Genetic variation can lead to {} drug response.",
                risk.as_str().to_lowercase()
            ),
        }
    }
}

impl ExplanationProvider for TemplateExplainer {
    fn generate(
        &self,
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
        risk: RiskLabel,
    ) -> anyhow::Result<Explanation> {
        Ok(Self::render(gene, phenotype, drug, risk))
    }
}

/// How a result's explanation came to be.
///
/// Serializes as the bare explanation, so the report wire shape is the
/// same whichever path produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationOutcome {
    /// The external provider answered.
    Generated(Explanation),
    /// The provider failed; the local template stood in.
    Degraded {
        fallback: Explanation,
        reason: String,
    },
}

impl ExplanationOutcome {
    pub fn explanation(&self) -> &Explanation {
        match self {
            Self::Generated(explanation) => explanation,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn degradation_reason(&self) -> Option<&str> {
        match self {
            Self::Generated(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

impl Serialize for ExplanationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.explanation().serialize(serializer)
    }
}
