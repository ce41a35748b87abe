//! Request-level error taxonomy.
//!
//! Only two conditions are fatal to an analysis request: a drug that
//! resolves to no pharmacogene, and a structured variant naming a gene
//! outside the supported set. Everything else (missing evidence for a
//! gene, explanation-service failure) is absorbed with a best-effort
//! fallback and reflected in the report's quality metrics instead.

use thiserror::Error;

/// Errors that fail an entire analysis request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The drug name resolved to no gene after alias normalization.
    #[error("Unsupported drug: {drug} (supported drugs include: {supported})")]
    UnsupportedDrug {
        /// The offending drug name, as submitted.
        drug: String,
        /// Comma-joined sample of supported drug names.
        supported: String,
    },

    /// A structured variant record named a gene outside the supported set.
    #[error("Unsupported gene: {gene}")]
    UnsupportedGene { gene: String },
}

impl AnalysisError {
    /// Whether this error should be reported to the caller as a client
    /// error (bad request) rather than a server fault. Every variant in
    /// this taxonomy is caused by the request contents.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedDrug { .. } | AnalysisError::UnsupportedGene { .. }
        )
    }
}
