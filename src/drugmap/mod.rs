//! Drug name normalization and drug-to-gene resolution.
//!
//! Drug names are lowercased, trimmed, and run through an alias table
//! (brand names, salt forms, synonyms) before lookup. The gene map is
//! seeded with a required minimum mapping for the six supported drugs,
//! and may be extended from a bundled relationship dataset; extension
//! failures never disturb the required mapping.

pub mod extended;

use crate::error::AnalysisError;
use crate::ontology::Pharmacogene;
use std::collections::HashMap;
use tracing::warn;

/// The six drug/gene pairs that must always resolve.
const REQUIRED_DRUG_MAP: [(&str, Pharmacogene); 6] = [
    ("codeine", Pharmacogene::CYP2D6),
    ("clopidogrel", Pharmacogene::CYP2C19),
    ("warfarin", Pharmacogene::CYP2C9),
    ("simvastatin", Pharmacogene::SLCO1B1),
    ("azathioprine", Pharmacogene::TPMT),
    ("fluorouracil", Pharmacogene::DPYD),
];

/// Brand names, salt forms, and chemical synonyms mapped to canonical
/// drug keys.
#[derive(Debug, Default, Clone)]
pub struct DrugAliasTable {
    aliases: HashMap<String, String>,
}

impl DrugAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut table = Self::new();

        // Brand names
        table.register("plavix", "clopidogrel");
        table.register("coumadin", "warfarin");
        table.register("jantoven", "warfarin");
        table.register("zocor", "simvastatin");
        table.register("imuran", "azathioprine");
        table.register("adrucil", "fluorouracil");

        // Salt forms
        table.register("warfarin sodium", "warfarin");
        table.register("codeine sulfate", "codeine");
        table.register("codeine phosphate", "codeine");

        // Chemical synonyms
        table.register("5-fu", "fluorouracil");
        table.register("5-fluorouracil", "fluorouracil");

        table
    }

    pub fn register(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.to_string(), canonical.to_string());
    }

    /// Lowercase, trim, and substitute through the alias table.
    pub fn canonicalize(&self, name: &str) -> String {
        let key = name.trim().to_lowercase();
        self.aliases.get(&key).cloned().unwrap_or(key)
    }
}

/// Resolves a drug name to its governing pharmacogene.
#[derive(Debug)]
pub struct DrugGeneResolver {
    aliases: DrugAliasTable,
    genes: HashMap<String, Pharmacogene>,
}

impl DrugGeneResolver {
    /// Resolver carrying only the required minimum mapping.
    pub fn with_defaults() -> Self {
        let mut genes = HashMap::new();
        for (drug, gene) in REQUIRED_DRUG_MAP {
            genes.insert(drug.to_string(), gene);
        }
        Self {
            aliases: DrugAliasTable::with_defaults(),
            genes,
        }
    }

    /// Resolver with the extended mapping merged beneath the required
    /// pairs: a required drug always keeps its required gene.
    pub fn with_extended(extended: HashMap<String, Pharmacogene>) -> Self {
        let mut resolver = Self::with_defaults();
        for (drug, gene) in extended {
            resolver.genes.entry(drug).or_insert(gene);
        }
        resolver
    }

    /// Resolver configured from an extension-loading attempt. A failed
    /// load degrades to the required mapping.
    pub fn from_extension_result(
        result: anyhow::Result<HashMap<String, Pharmacogene>>,
    ) -> Self {
        match result {
            Ok(extended) => Self::with_extended(extended),
            Err(err) => {
                warn!(error = %err, "extended drug map unavailable, using required mapping");
                Self::with_defaults()
            }
        }
    }

    /// Map a drug name to its governing gene.
    pub fn resolve(&self, name: &str) -> Result<Pharmacogene, AnalysisError> {
        let key = self.aliases.canonicalize(name);
        self.genes
            .get(&key)
            .copied()
            .ok_or_else(|| AnalysisError::UnsupportedDrug {
                drug: name.to_string(),
                supported: self.supported_sample(),
            })
    }

    /// Canonical key for a drug name, shared with guideline lookup.
    pub fn canonical_key(&self, name: &str) -> String {
        self.aliases.canonicalize(name)
    }

    /// A sorted sample of supported drug names for error messages.
    pub fn supported_sample(&self) -> String {
        let mut names: Vec<&str> = REQUIRED_DRUG_MAP.iter().map(|(drug, _)| *drug).collect();
        names.sort_unstable();
        names.join(", ")
    }

    pub fn mapped_drug_count(&self) -> usize {
        self.genes.len()
    }
}
