//! Clinical guideline resolution.
//!
//! Maps a (gene, phenotype, drug) triple to a recommendation through a
//! three-tier fallback that must be preserved exactly: an exact guideline
//! match wins; otherwise a phenotype in the gene's known-safe set yields
//! a synthesized Safe outcome; otherwise the outcome is Unknown with a
//! consult-clinician action. Collapsing the tiers would lose the
//! distinction between "verified safe" and "no information".

use crate::drugmap::DrugAliasTable;
use crate::ontology::Pharmacogene;
use crate::phenotype::Phenotype;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Predicted drug-response risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Toxic,
    Ineffective,
    Safe,
    Unknown,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toxic => "Toxic",
            Self::Ineffective => "Ineffective",
            Self::Safe => "Safe",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical severity of the predicted risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Evidence tier attached to a guideline outcome. Drives the numeric
/// confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceGrade {
    A,
    B,
    C,
}

impl EvidenceGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Parse a grade label. Returns `None` for anything outside the
    /// closed grade set.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }
}

/// Immutable result of a (gene, phenotype, drug) guideline lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineOutcome {
    pub risk_label: RiskLabel,
    pub severity: Severity,
    pub action: String,
    pub details: String,
    pub evidence_grade: EvidenceGrade,
}

impl GuidelineOutcome {
    fn new(
        risk_label: RiskLabel,
        severity: Severity,
        action: &str,
        details: &str,
        evidence_grade: EvidenceGrade,
    ) -> Self {
        Self {
            risk_label,
            severity,
            action: action.to_string(),
            details: details.to_string(),
            evidence_grade,
        }
    }

    /// Synthesized outcome for a phenotype in the gene's known-safe set.
    fn known_safe(gene: Pharmacogene, phenotype: Phenotype) -> Self {
        Self::new(
            RiskLabel::Safe,
            Severity::None,
            "Use standard dosing",
            &format!(
                "{gene} {phenotype} is not associated with increased risk for this drug."
            ),
            EvidenceGrade::B,
        )
    }

    /// Outcome when no guideline applies and the phenotype carries no
    /// known-safe assurance.
    fn unknown() -> Self {
        Self::new(
            RiskLabel::Unknown,
            Severity::None,
            "Consult clinician",
            "No guideline available for this combination.",
            EvidenceGrade::C,
        )
    }
}

/// Registry of curated gene-phenotype-drug guidelines.
#[derive(Debug)]
pub struct GuidelineRegistry {
    rules: HashMap<(Pharmacogene, Phenotype, String), GuidelineOutcome>,
    known_safe: HashMap<Pharmacogene, HashSet<Phenotype>>,
    aliases: DrugAliasTable,
}

impl GuidelineRegistry {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            known_safe: HashMap::new(),
            aliases: DrugAliasTable::with_defaults(),
        }
    }

    /// Registry pre-populated with the curated guideline rules and
    /// known-safe phenotype sets for the six supported genes.
    pub fn with_defaults() -> Self {
        use EvidenceGrade::*;
        use Pharmacogene::*;
        use RiskLabel::*;

        let mut registry = Self::new();

        registry.register(
            CYP2D6,
            Phenotype::UM,
            "codeine",
            GuidelineOutcome::new(
                Toxic,
                Severity::Critical,
                "Avoid use",
                "Ultra-rapid metabolism can cause dangerous morphine levels.",
                A,
            ),
        );
        registry.register(
            CYP2D6,
            Phenotype::PM,
            "codeine",
            GuidelineOutcome::new(
                Ineffective,
                Severity::High,
                "Use alternative analgesic",
                "Codeine requires CYP2D6 activation; poor metabolizers get little analgesia.",
                A,
            ),
        );

        registry.register(
            CYP2C19,
            Phenotype::PM,
            "clopidogrel",
            GuidelineOutcome::new(
                Ineffective,
                Severity::High,
                "Use alternative antiplatelet therapy",
                "Clopidogrel requires CYP2C19 activation; poor metabolizers may not benefit.",
                A,
            ),
        );
        registry.register(
            CYP2C19,
            Phenotype::IM,
            "clopidogrel",
            GuidelineOutcome::new(
                Ineffective,
                Severity::Moderate,
                "Consider alternative antiplatelet therapy",
                "Reduced clopidogrel activation lowers platelet inhibition.",
                A,
            ),
        );

        registry.register(
            CYP2C9,
            Phenotype::PM,
            "warfarin",
            GuidelineOutcome::new(
                Toxic,
                Severity::High,
                "Reduce dose",
                "Poor metabolism increases bleeding risk.",
                A,
            ),
        );
        registry.register(
            CYP2C9,
            Phenotype::IM,
            "warfarin",
            GuidelineOutcome::new(
                Toxic,
                Severity::Moderate,
                "Reduce initial dose",
                "Reduced warfarin clearance; titrate with more frequent INR checks.",
                A,
            ),
        );

        registry.register(
            SLCO1B1,
            Phenotype::Low,
            "simvastatin",
            GuidelineOutcome::new(
                Toxic,
                Severity::Moderate,
                "Use lower dose or alternative statin",
                "Low transporter function increases risk of myopathy.",
                A,
            ),
        );
        registry.register(
            SLCO1B1,
            Phenotype::Decreased,
            "simvastatin",
            GuidelineOutcome::new(
                Toxic,
                Severity::Moderate,
                "Limit dose to 20mg or use alternative statin",
                "Decreased transporter function raises simvastatin exposure.",
                A,
            ),
        );

        registry.register(
            TPMT,
            Phenotype::Low,
            "azathioprine",
            GuidelineOutcome::new(
                Toxic,
                Severity::Critical,
                "Avoid use",
                "Low TPMT activity can cause life-threatening myelosuppression.",
                A,
            ),
        );
        registry.register(
            TPMT,
            Phenotype::Intermediate,
            "azathioprine",
            GuidelineOutcome::new(
                Toxic,
                Severity::Moderate,
                "Reduce dose 30-70%",
                "Intermediate TPMT activity warrants a reduced thiopurine dose.",
                A,
            ),
        );

        registry.register(
            DPYD,
            Phenotype::Deficient,
            "fluorouracil",
            GuidelineOutcome::new(
                Toxic,
                Severity::Critical,
                "Avoid use",
                "DPYD deficiency causes severe fluorouracil toxicity.",
                A,
            ),
        );
        registry.register(
            DPYD,
            Phenotype::Intermediate,
            "fluorouracil",
            GuidelineOutcome::new(
                Toxic,
                Severity::High,
                "Reduce starting dose by 50%",
                "Partial DPYD deficiency raises fluoropyrimidine exposure.",
                A,
            ),
        );

        registry.register_known_safe(CYP2D6, Phenotype::NM);
        registry.register_known_safe(CYP2C19, Phenotype::NM);
        registry.register_known_safe(CYP2C19, Phenotype::RM);
        registry.register_known_safe(CYP2C9, Phenotype::NM);
        registry.register_known_safe(SLCO1B1, Phenotype::Normal);
        registry.register_known_safe(TPMT, Phenotype::Normal);
        registry.register_known_safe(DPYD, Phenotype::Normal);

        registry
    }

    /// Register an exact guideline rule. The drug name is normalized
    /// through the alias table, so rules and queries meet on the same
    /// canonical key.
    pub fn register(
        &mut self,
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
        outcome: GuidelineOutcome,
    ) {
        let key = self.aliases.canonicalize(drug);
        self.rules.insert((gene, phenotype, key), outcome);
    }

    /// Mark a phenotype as known-safe for a gene.
    pub fn register_known_safe(&mut self, gene: Pharmacogene, phenotype: Phenotype) {
        self.known_safe.entry(gene).or_default().insert(phenotype);
    }

    /// Resolve the recommendation for a gene, phenotype, and drug.
    pub fn resolve(
        &self,
        gene: Pharmacogene,
        phenotype: Phenotype,
        drug: &str,
    ) -> GuidelineOutcome {
        let key = self.aliases.canonicalize(drug);

        if let Some(outcome) = self.rules.get(&(gene, phenotype, key)) {
            return outcome.clone();
        }

        if self
            .known_safe
            .get(&gene)
            .is_some_and(|set| set.contains(&phenotype))
        {
            return GuidelineOutcome::known_safe(gene, phenotype);
        }

        GuidelineOutcome::unknown()
    }
}
