//! Marker-to-allele reference table.
//!
//! Maps well-known variant marker identifiers (rsIDs) to the gene and
//! star allele they define. Used during raw variant-call decoding to
//! resolve the gene of records that carry no explicit gene annotation.

use super::genes::Pharmacogene;
use std::collections::HashMap;

/// Static registry of marker id -> (gene, star allele) associations.
#[derive(Debug, Default)]
pub struct MarkerTable {
    markers: HashMap<String, (Pharmacogene, String)>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the key defining variants of the six
    /// supported genes.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();

        // CYP2D6
        table.register("rs35742686", Pharmacogene::CYP2D6, "*3");
        table.register("rs3892097", Pharmacogene::CYP2D6, "*4");
        table.register("rs5030655", Pharmacogene::CYP2D6, "*6");
        table.register("rs1065852", Pharmacogene::CYP2D6, "*10");
        table.register("rs28371725", Pharmacogene::CYP2D6, "*41");

        // CYP2C19
        table.register("rs4244285", Pharmacogene::CYP2C19, "*2");
        table.register("rs4986893", Pharmacogene::CYP2C19, "*3");
        table.register("rs12248560", Pharmacogene::CYP2C19, "*17");

        // CYP2C9
        table.register("rs1799853", Pharmacogene::CYP2C9, "*2");
        table.register("rs1057910", Pharmacogene::CYP2C9, "*3");

        // SLCO1B1
        table.register("rs4149056", Pharmacogene::SLCO1B1, "*5");

        // TPMT
        table.register("rs1800462", Pharmacogene::TPMT, "*2");
        table.register("rs1800460", Pharmacogene::TPMT, "*3B");
        table.register("rs1142345", Pharmacogene::TPMT, "*3C");

        // DPYD
        table.register("rs3918290", Pharmacogene::DPYD, "*2A");

        table
    }

    pub fn register(&mut self, marker_id: &str, gene: Pharmacogene, star_allele: &str) {
        self.markers
            .insert(marker_id.to_string(), (gene, star_allele.to_string()));
    }

    /// Look up the (gene, star allele) association for a marker id.
    pub fn get(&self, marker_id: &str) -> Option<&(Pharmacogene, String)> {
        self.markers.get(marker_id)
    }

    /// Gene association only.
    pub fn gene_of(&self, marker_id: &str) -> Option<Pharmacogene> {
        self.markers.get(marker_id).map(|(gene, _)| *gene)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
