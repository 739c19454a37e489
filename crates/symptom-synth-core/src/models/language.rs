//! Output languages for generated text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language (or register) a sample is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English templates and symptoms
    En,
    /// Bangla templates, symptoms localized through the lexicon
    Bn,
    /// English templates with Bangla symptoms transliterated to Latin script
    Banglish,
    /// English sentence, some symptoms in Bangla, Bangla closing phrase
    Mixed,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Bn, Language::Banglish, Language::Mixed];

    /// Tag written to the dataset's `language` column.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bn => "bn",
            Language::Banglish => "banglish",
            Language::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unrecognized language tag.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown language tag: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "bn" | "bangla" | "bengali" => Ok(Language::Bn),
            "banglish" => Ok(Language::Banglish),
            "mixed" => Ok(Language::Mixed),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.tag().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("Bengali".parse::<Language>().unwrap(), Language::Bn);
        assert_eq!(" English ".parse::<Language>().unwrap(), Language::En);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Language::Banglish).unwrap();
        assert_eq!(json, "\"banglish\"");
    }
}
