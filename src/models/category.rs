use serde::{Deserialize, Serialize};

/// The closed set of expense categories.
///
/// Serialized as lowercase English keys. The Spanish keys written by the
/// earlier browser version of the tracker are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "comida")]
    Food,
    #[serde(alias = "transporte")]
    Transport,
    #[serde(alias = "entretenimiento")]
    Entertainment,
    #[serde(alias = "salud")]
    Health,
    #[serde(alias = "hogar")]
    Home,
    #[serde(alias = "otros")]
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Entertainment,
            Self::Health,
            Self::Home,
            Self::Other,
        ]
    }

    /// Storage key, e.g. `"food"`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Home => "home",
            Self::Other => "other",
        }
    }

    /// Capitalized display name, e.g. `"Food"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Home => "Home",
            Self::Other => "Other",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Transport => "🚗",
            Self::Entertainment => "🎬",
            Self::Health => "💊",
            Self::Home => "🏠",
            Self::Other => "📦",
        }
    }

    /// Chart slice color as RGB.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Food => (250, 179, 135),
            Self::Transport => (137, 180, 250),
            Self::Entertainment => (203, 166, 247),
            Self::Health => (166, 227, 161),
            Self::Home => (249, 226, 175),
            Self::Other => (147, 153, 178),
        }
    }

    /// Parse user input (case-insensitive). Accepts English keys, display
    /// names and the legacy Spanish keys.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" | "comida" => Some(Self::Food),
            "transport" | "transporte" => Some(Self::Transport),
            "entertainment" | "entretenimiento" => Some(Self::Entertainment),
            "health" | "salud" => Some(Self::Health),
            "home" | "hogar" => Some(Self::Home),
            "other" | "otros" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
