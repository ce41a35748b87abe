//! Supported pharmacogene set.
//!
//! The pipeline covers six pharmacogenes with well-established drug
//! response associations. Gene symbols are case-normalized to uppercase
//! on ingestion; anything outside this set is rejected as invalid input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pharmacogene - genes with known pharmacogenomic significance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pharmacogene {
    // CYP450 enzymes
    CYP2D6,
    CYP2C19,
    CYP2C9,

    // Transporter
    SLCO1B1,

    // Phase II / catabolic enzymes
    TPMT,
    DPYD,
}

/// All supported genes, in stable reporting order.
pub const ALL_GENES: [Pharmacogene; 6] = [
    Pharmacogene::CYP2D6,
    Pharmacogene::CYP2C19,
    Pharmacogene::CYP2C9,
    Pharmacogene::SLCO1B1,
    Pharmacogene::TPMT,
    Pharmacogene::DPYD,
];

impl Pharmacogene {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CYP2D6 => "CYP2D6",
            Self::CYP2C19 => "CYP2C19",
            Self::CYP2C9 => "CYP2C9",
            Self::SLCO1B1 => "SLCO1B1",
            Self::TPMT => "TPMT",
            Self::DPYD => "DPYD",
        }
    }

    /// Parse a gene symbol, case-insensitively. Returns `None` for any
    /// symbol outside the supported set.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CYP2D6" => Some(Self::CYP2D6),
            "CYP2C19" => Some(Self::CYP2C19),
            "CYP2C9" => Some(Self::CYP2C9),
            "SLCO1B1" => Some(Self::SLCO1B1),
            "TPMT" => Some(Self::TPMT),
            "DPYD" => Some(Self::DPYD),
            _ => None,
        }
    }
}

impl fmt::Display for Pharmacogene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
