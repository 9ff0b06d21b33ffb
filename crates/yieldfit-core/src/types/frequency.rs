//! Coupon frequency.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Payment frequency for coupon bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year), UK gilts and US treasuries
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
}

impl Frequency {
    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', '_', ' '], "").as_str() {
            "ANNUAL" | "A" | "1" => Ok(Frequency::Annual),
            "SEMIANNUAL" | "S" | "SA" | "2" => Ok(Frequency::SemiAnnual),
            "QUARTERLY" | "Q" | "4" => Ok(Frequency::Quarterly),
            "MONTHLY" | "M" | "12" => Ok(Frequency::Monthly),
            _ => Err(CoreError::UnknownFrequency {
                name: s.to_string(),
            }),
        }
    }
}
