//! PGxGuard pharmacogenomic decision library.
//!
//! Implements the variant-to-decision pipeline for assessing how a
//! patient's genetic makeup affects the safety and efficacy of
//! prescribed drugs:
//! - Variant evidence extraction (structured records or raw
//!   variant-call text)
//! - Diplotype canonicalization and phenotype classification
//! - Drug-to-gene resolution with alias normalization
//! - Guideline lookup with a three-tier fallback
//! - Evidence-graded confidence scoring
//! - Explanation generation with a deterministic local fallback
//!
//! # Example
//!
//! ```
//! use pgxguard::{Analyzer, AnalysisRequest};
//!
//! let analyzer = Analyzer::with_defaults();
//! let request = AnalysisRequest {
//!     patient_id: "PATIENT_001".to_string(),
//!     drugs: vec!["Plavix".to_string()],
//!     variants: None,
//!     vcf_content: None,
//! };
//!
//! // No evidence for CYP2C19: the pipeline assumes wild-type rather
//! // than failing the request.
//! let report = analyzer.analyze(&request).unwrap();
//! assert_eq!(report.results.len(), 1);
//! assert_eq!(report.quality_metrics.missing_gene_fallback_count, 1);
//! ```

pub mod confidence;
pub mod drugmap;
pub mod error;
pub mod explain;
pub mod guideline;
pub mod ontology;
pub mod phenotype;
pub mod pipeline;
pub mod variant;

// Re-export the working surface.
pub use error::AnalysisError;
pub use explain::{Explanation, ExplanationOutcome, ExplanationProvider, TemplateExplainer};
pub use guideline::{EvidenceGrade, GuidelineOutcome, GuidelineRegistry, RiskLabel, Severity};
pub use ontology::{MarkerTable, Pharmacogene};
pub use phenotype::{Phenotype, PhenotypeClassifier};
pub use pipeline::{AnalysisReport, AnalysisRequest, Analyzer, DrugResult, PipelineConfig};
pub use variant::{VariantExtractor, VariantInput, VariantRecord};
