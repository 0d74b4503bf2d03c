//! Shared primitive types used across the entire credit desk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequential applicant identifier. The first record is 1.
pub type RecordId = i64;

/// Business sector of the applicant.
/// The serde key doubles as the storage key in the applicant table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Carpentry,
    Eatery,
    Tailoring,
    Bakery,
    Ironwork,
    Retail,
    Other,
}

impl Sector {
    pub const ALL: [Sector; 7] = [
        Self::Carpentry,
        Self::Eatery,
        Self::Tailoring,
        Self::Bakery,
        Self::Ironwork,
        Self::Retail,
        Self::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Carpentry => "carpentry",
            Self::Eatery    => "eatery",
            Self::Tailoring => "tailoring",
            Self::Bakery    => "bakery",
            Self::Ironwork  => "ironwork",
            Self::Retail    => "retail",
            Self::Other     => "other",
        }
    }

    /// Display label shown to loan officers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Carpentry => "Carpintería",
            Self::Eatery    => "Comedor",
            Self::Tailoring => "Corte y confección",
            Self::Bakery    => "Panadería",
            Self::Ironwork  => "Herrería",
            Self::Retail    => "Comercio",
            Self::Other     => "Otros",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sector| sector.key() == s)
            .ok_or_else(|| format!("unknown sector '{s}'"))
    }
}

/// What the requested funds will be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FundUse {
    WorkingCapital,
    InvestmentCapital,
}

impl FundUse {
    pub fn key(&self) -> &'static str {
        match self {
            Self::WorkingCapital    => "working_capital",
            Self::InvestmentCapital => "investment_capital",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WorkingCapital    => "Capital de trabajo",
            Self::InvestmentCapital => "Capital de inversión",
        }
    }
}

impl fmt::Display for FundUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FundUse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working_capital"    => Ok(Self::WorkingCapital),
            "investment_capital" => Ok(Self::InvestmentCapital),
            other => Err(format!("unknown fund use '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_keys_parse_back() {
        for sector in Sector::ALL {
            assert_eq!(sector.key().parse::<Sector>().unwrap(), sector);
        }
        assert!("bakery ".parse::<Sector>().is_err());
    }

    #[test]
    fn fund_use_serde_matches_storage_key() {
        let json = serde_json::to_string(&FundUse::InvestmentCapital).unwrap();
        assert_eq!(json, "\"investment_capital\"");
        assert_eq!(FundUse::InvestmentCapital.key(), "investment_capital");
    }
}
