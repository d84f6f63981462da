use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            _ => Err(CoreError::InvalidInput("side".to_string(), s.to_string())),
        }
    }
}

/// The daily market mood, as published by a fear & greed index.
///
/// The variant order is the ordinal order of the index and is the sort order
/// used for every grouped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::ExtremeFear,
        Classification::Fear,
        Classification::Neutral,
        Classification::Greed,
        Classification::ExtremeGreed,
    ];

    /// The label used in the published index and in every report.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::ExtremeFear => "Extreme Fear",
            Classification::Fear => "Fear",
            Classification::Neutral => "Neutral",
            Classification::Greed => "Greed",
            Classification::ExtremeGreed => "Extreme Greed",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = CoreError;

    /// Accepts "Extreme Fear", "extreme_fear", "extreme-fear" and "ExtremeFear" alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "extremefear" => Ok(Classification::ExtremeFear),
            "fear" => Ok(Classification::Fear),
            "neutral" => Ok(Classification::Neutral),
            "greed" => Ok(Classification::Greed),
            "extremegreed" => Ok(Classification::ExtremeGreed),
            _ => Err(CoreError::InvalidInput(
                "classification".to_string(),
                s.to_string(),
            )),
        }
    }
}
