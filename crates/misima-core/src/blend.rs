//! The three product lines the catalogue is organised around.

use serde::{Deserialize, Serialize};

/// Number of leading characters of a collection name that form its slug.
const SLUG_LEN: usize = 5;

/// A named product line. Drives both filtering and per-line styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    Pablo,
    Maria,
    Diego,
}

impl Blend {
    pub const ALL: [Blend; 3] = [Blend::Pablo, Blend::Maria, Blend::Diego];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Blend::Pablo => "pablo",
            Blend::Maria => "maria",
            Blend::Diego => "diego",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Blend::Pablo => "Pablo's blend",
            Blend::Maria => "Maria's blend",
            Blend::Diego => "Diego's blend",
        }
    }

    /// Exact slug match. Anything else is "no specific blend".
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.slug() == slug)
    }
}

impl std::fmt::Display for Blend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Lower-cases `value` and keeps its first five characters.
///
/// `"Maria Premium"` becomes `"maria"`. Values that do not start with a
/// blend name still produce a slug; it just matches no known blend.
#[must_use]
pub fn collection_slug(value: &str) -> String {
    value
        .chars()
        .take(SLUG_LEN)
        .collect::<String>()
        .to_lowercase()
}
