//! Diplotype canonicalization and phenotype classification.
//!
//! Maps a (gene, diplotype) pair to the patient's metabolic phenotype via
//! hand-curated per-gene lookup tables. The tables are authoritative: a
//! diplotype classifies only by exact canonical match (or the reversed
//! pair as a fallback), never by inference.

use crate::ontology::Pharmacogene;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The reference (wild-type) star allele.
pub const REFERENCE_ALLELE: &str = "*1";

/// Metabolic phenotype categories.
///
/// Enzyme-activity genes use the metabolizer scale (UM, RM, NM, IM, PM);
/// transporter and enzyme-deficiency genes use a function scale (Normal,
/// Decreased, Low, Intermediate, Deficient). `Unknown` is the sentinel
/// for a diplotype the gene's table does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phenotype {
    // Metabolizer scale
    UM,
    RM,
    NM,
    IM,
    PM,

    // Function scale
    Normal,
    Decreased,
    Low,
    Intermediate,
    Deficient,

    Unknown,
}

impl Phenotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UM => "UM",
            Self::RM => "RM",
            Self::NM => "NM",
            Self::IM => "IM",
            Self::PM => "PM",
            Self::Normal => "Normal",
            Self::Decreased => "Decreased",
            Self::Low => "Low",
            Self::Intermediate => "Intermediate",
            Self::Deficient => "Deficient",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a `"allele1/allele2"` diplotype for table lookup.
///
/// If exactly one side is the reference allele it is placed first, to
/// match tables keyed `*1/<variant>`. Otherwise the two designators are
/// ordered lexicographically. Input that is not exactly two
/// `/`-separated parts is returned unchanged.
pub fn canonicalize(diplotype: &str) -> String {
    let parts: Vec<&str> = diplotype.split('/').collect();
    if parts.len() != 2 {
        return diplotype.to_string();
    }
    let (a, b) = (parts[0], parts[1]);

    if (a == REFERENCE_ALLELE) != (b == REFERENCE_ALLELE) {
        let variant = if a == REFERENCE_ALLELE { b } else { a };
        return format!("{REFERENCE_ALLELE}/{variant}");
    }

    if a <= b {
        format!("{a}/{b}")
    } else {
        format!("{b}/{a}")
    }
}

/// The reversed allele pair, used as the second (and last) lookup key.
fn reversed(diplotype: &str) -> Option<String> {
    let (a, b) = diplotype.split_once('/')?;
    if b.contains('/') {
        return None;
    }
    Some(format!("{b}/{a}"))
}

/// Per-gene diplotype -> phenotype lookup.
#[derive(Debug, Default)]
pub struct PhenotypeClassifier {
    tables: HashMap<Pharmacogene, HashMap<String, Phenotype>>,
}

impl PhenotypeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier pre-populated with the curated diplotype tables for
    /// all six supported genes.
    pub fn with_defaults() -> Self {
        use Pharmacogene::*;
        use Phenotype::*;

        let mut c = Self::new();

        c.register(CYP2D6, "*1/*1", NM);
        c.register(CYP2D6, "*1/*4", IM);
        c.register(CYP2D6, "*4/*4", PM);
        c.register(CYP2D6, "*1/*1XN", UM);
        c.register(CYP2D6, "*10/*10", IM);
        c.register(CYP2D6, "*10/*4", IM);

        c.register(CYP2C19, "*1/*1", NM);
        c.register(CYP2C19, "*1/*2", IM);
        c.register(CYP2C19, "*2/*2", PM);
        c.register(CYP2C19, "*1/*17", RM);
        c.register(CYP2C19, "*17/*17", UM);
        c.register(CYP2C19, "*17/*2", IM);

        c.register(CYP2C9, "*1/*1", NM);
        c.register(CYP2C9, "*1/*2", IM);
        c.register(CYP2C9, "*1/*3", IM);
        c.register(CYP2C9, "*2/*2", IM);
        c.register(CYP2C9, "*2/*3", PM);
        c.register(CYP2C9, "*3/*3", PM);

        c.register(SLCO1B1, "*1/*1", Normal);
        c.register(SLCO1B1, "*1/*5", Decreased);
        c.register(SLCO1B1, "*5/*5", Low);
        c.register(SLCO1B1, "*1/*15", Decreased);
        c.register(SLCO1B1, "*15/*15", Low);

        c.register(TPMT, "*1/*1", Normal);
        c.register(TPMT, "*1/*3A", Intermediate);
        c.register(TPMT, "*3A/*3A", Low);
        c.register(TPMT, "*1/*2", Intermediate);
        c.register(TPMT, "*2/*3A", Low);

        c.register(DPYD, "*1/*1", Normal);
        // Key order kept as curated; the reversed lookup covers *1/*2A.
        c.register(DPYD, "*2A/*1", Intermediate);
        c.register(DPYD, "*2A/*2A", Deficient);

        c
    }

    pub fn register(&mut self, gene: Pharmacogene, diplotype: &str, phenotype: Phenotype) {
        self.tables
            .entry(gene)
            .or_default()
            .insert(diplotype.to_string(), phenotype);
    }

    /// Classify a diplotype for a gene. Tries the canonical form, then
    /// the reversed pair, and returns `Unknown` on a double miss.
    pub fn classify(&self, gene: Pharmacogene, diplotype: &str) -> Phenotype {
        let Some(table) = self.tables.get(&gene) else {
            return Phenotype::Unknown;
        };

        let canonical = canonicalize(diplotype);
        if let Some(phenotype) = table.get(&canonical) {
            return *phenotype;
        }
        if let Some(rev) = reversed(&canonical) {
            if let Some(phenotype) = table.get(&rev) {
                return *phenotype;
            }
        }
        Phenotype::Unknown
    }
}
