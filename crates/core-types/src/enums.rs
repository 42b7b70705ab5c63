use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The exchange an ETF is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    #[serde(alias = "SH", alias = "shanghai")]
    Sh,
    #[serde(alias = "SZ", alias = "shenzhen")]
    Sz,
}

impl Exchange {
    /// The lowercase prefix used to qualify a raw symbol (e.g. `sh510300`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Exchange::Sh => "sh",
            Exchange::Sz => "sz",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Exchange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sh" | "shanghai" => Ok(Exchange::Sh),
            "sz" | "shenzhen" => Ok(Exchange::Sz),
            other => Err(CoreError::InvalidInput(
                "exchange".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// How historical prices are adjusted for corporate actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
    /// Raw traded prices.
    None,
    /// Front-adjusted: past prices rescaled so the latest bar is unchanged.
    #[default]
    Front,
    /// Back-adjusted: later prices rescaled so the first bar is unchanged.
    Back,
}

impl fmt::Display for AdjustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdjustMode::None => "none",
            AdjustMode::Front => "front",
            AdjustMode::Back => "back",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_parses_prefixes_case_insensitively() {
        assert_eq!("sh".parse::<Exchange>().unwrap(), Exchange::Sh);
        assert_eq!("SZ".parse::<Exchange>().unwrap(), Exchange::Sz);
        assert!("bj".parse::<Exchange>().is_err());
    }

    #[test]
    fn adjust_mode_defaults_to_front() {
        assert_eq!(AdjustMode::default(), AdjustMode::Front);
    }
}
