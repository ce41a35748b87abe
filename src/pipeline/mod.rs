//! Pipeline orchestration.
//!
//! [`Analyzer`] composes the extractor, classifier, resolvers, scorer,
//! and explanation provider into the per-drug decision flow: resolve
//! gene, look up (or default) the variant evidence, classify phenotype,
//! resolve the guideline, score confidence, and attach an explanation.
//! All static reference tables are built once at construction and shared
//! immutably across requests.

use crate::confidence;
use crate::drugmap::{extended::load_extended_map, DrugGeneResolver};
use crate::error::AnalysisError;
use crate::explain::{ExplanationOutcome, ExplanationProvider, TemplateExplainer};
use crate::guideline::{GuidelineRegistry, RiskLabel, Severity};
use crate::ontology::Pharmacogene;
use crate::phenotype::{Phenotype, PhenotypeClassifier};
use crate::variant::{extract_evidence, VariantExtractor, VariantInput, VariantRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Opt-in: merge the bundled relationship dataset beneath the
    /// required drug-gene mapping.
    pub use_extended_drug_map: bool,
    /// Location of the bundled relationship dataset.
    pub extended_map_path: PathBuf,
    /// Latency budget for the external explanation call. Providers are
    /// expected to enforce it; overruns degrade to the local template.
    pub explanation_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_extended_drug_map: false,
            extended_map_path: PathBuf::from("data/relationships.tsv"),
            explanation_timeout_secs: 10,
        }
    }
}

impl PipelineConfig {
    pub fn explanation_timeout(&self) -> Duration {
        Duration::from_secs(self.explanation_timeout_secs)
    }
}

/// One analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub patient_id: String,
    pub drugs: Vec<String>,
    /// Structured variant records; take precedence over `vcf_content`.
    #[serde(default)]
    pub variants: Option<Vec<VariantInput>>,
    /// Raw variant-call text.
    #[serde(default)]
    pub vcf_content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub confidence_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectedVariant {
    pub marker_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: Pharmacogene,
    pub diplotype: String,
    pub phenotype: Phenotype,
    pub detected_variants: Vec<DetectedVariant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicalRecommendation {
    pub action: String,
    pub details: String,
}

/// Per-drug result, assembled once and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct DrugResult {
    pub drug: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: ExplanationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub parsed_variant_count: usize,
    /// Drugs whose gene had no evidence and fell back to `*1/*1`.
    pub missing_gene_fallback_count: usize,
}

/// Top-level analysis output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub patient_id: String,
    /// ISO-8601 UTC.
    pub timestamp: String,
    pub results: Vec<DrugResult>,
    pub quality_metrics: QualityMetrics,
}

/// The orchestrator. Holds every static reference table plus the
/// explanation provider; safe to share across threads.
pub struct Analyzer {
    config: PipelineConfig,
    extractor: VariantExtractor,
    classifier: PhenotypeClassifier,
    resolver: DrugGeneResolver,
    guidelines: GuidelineRegistry,
    explainer: Box<dyn ExplanationProvider>,
}

impl Analyzer {
    /// Analyzer with default configuration and the local template
    /// explainer.
    pub fn with_defaults() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let resolver = if config.use_extended_drug_map {
            DrugGeneResolver::from_extension_result(load_extended_map(&config.extended_map_path))
        } else {
            DrugGeneResolver::with_defaults()
        };

        Self {
            config,
            extractor: VariantExtractor::with_defaults(),
            classifier: PhenotypeClassifier::with_defaults(),
            resolver,
            guidelines: GuidelineRegistry::with_defaults(),
            explainer: Box::new(TemplateExplainer),
        }
    }

    /// Replace the explanation provider.
    pub fn with_provider(mut self, provider: Box<dyn ExplanationProvider>) -> Self {
        self.explainer = provider;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full per-drug decision flow and assemble the report.
    ///
    /// Fails only on an unsupported drug or gene; missing evidence and
    /// explanation failures degrade and are reflected in the quality
    /// metrics and explanation outcome instead.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let evidence = extract_evidence(
            &self.extractor,
            request.variants.clone(),
            request.vcf_content.as_deref(),
        )?;
        let parsed_variant_count = evidence.len();

        let mut missing_gene_fallback_count = 0;
        let mut results = Vec::with_capacity(request.drugs.len());

        for drug in &request.drugs {
            let gene = self.resolver.resolve(drug)?;

            let record = match evidence.iter().find(|v| v.gene == gene) {
                Some(record) => record.clone(),
                None => {
                    debug!(%gene, drug = %drug, "no evidence for gene, assuming wild-type");
                    missing_gene_fallback_count += 1;
                    VariantRecord::reference(gene)
                }
            };

            let phenotype = self.classifier.classify(gene, &record.diplotype);
            let outcome = self.guidelines.resolve(gene, phenotype, drug);
            let confidence_score = confidence::score(outcome.evidence_grade);
            let explanation = self.explain(gene, phenotype, drug, outcome.risk_label);

            results.push(DrugResult {
                drug: drug.clone(),
                risk_assessment: RiskAssessment {
                    risk_label: outcome.risk_label,
                    confidence_score,
                    severity: outcome.severity,
                },
                pharmacogenomic_profile: PharmacogenomicProfile {
                    primary_gene: gene,
                    diplotype: record.diplotype.clone(),
                    phenotype,
                    detected_variants: vec![DetectedVariant {
                        marker_id: record.marker_id.clone(),
                    }],
                },
                clinical_recommendation: ClinicalRecommendation {
                    action: outcome.action,
                    details: outcome.details,
                },
                llm_generated_explanation: explanation,
            });
        }

        Ok(AnalysisReport {
            patient_id: request.patient_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            results,
            quality_metrics: QualityMetrics {
                vcf_parsing_success: true,
                parsed_variant_count,
                missing_gene_fallback_count,
            },
        })
    }

    /// Ask the provider for an explanation, degrading to the local
    /// template on any failure.
    fn explain(
        &self,
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
        risk: RiskLabel,
    ) -> ExplanationOutcome {
        match self.explainer.generate(gene, phenotype, drug, risk) {
            Ok(explanation) => ExplanationOutcome::Generated(explanation),
            Err(err) => {
                warn!(error = %err, drug, "explanation provider failed, using template");
                ExplanationOutcome::Degraded {
                    fallback: TemplateExplainer::render(gene, phenotype, drug, risk),
                    reason: err.to_string(),
                }
            }
        }
    }
}
