use serde::{Deserialize, Serialize};

/// What a contig turned out to be after circularisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Circular, with a qualifying hit to an origin sequence
    Chromosome,
    /// Circular, no origin hit
    Plasmid,
    /// No terminal overlap was found
    Linear,
}

impl Classification {
    /// Prefix used when numbering output names
    #[must_use]
    pub fn name_prefix(self) -> Option<&'static str> {
        match self {
            Self::Chromosome => Some("chromosome"),
            Self::Plasmid => Some("plasmid"),
            Self::Linear => None,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chromosome => write!(f, "chromosome"),
            Self::Plasmid => write!(f, "plasmid"),
            Self::Linear => write!(f, "linear"),
        }
    }
}
