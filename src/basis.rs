use crate::error::Error;
use std::fmt;

/// Day-count conventions, carried with their conventional numeric codes.
///
/// None of the annuity formulas consult a basis; the enum exists so callers
/// exchanging basis codes with spreadsheet-style APIs have a typed value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountBasis {
    /// MSRB/NASD 30/360 (MSRB rule G-33).
    #[default]
    Msrb30_360 = 0,
    /// Actual days over actual days in the year.
    ActualActual = 1,
    Actual360 = 2,
    /// Short term and Canadian bonds.
    Actual365 = 3,
    /// 31st of either date moves to the 30th.
    European30_360 = 4,
    /// 31st of the start date moves to the 30th, 31st of the end date to the
    /// 1st of the following month.
    European30Plus360 = 5,
}

impl DayCountBasis {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DayCountBasis {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DayCountBasis::Msrb30_360),
            1 => Ok(DayCountBasis::ActualActual),
            2 => Ok(DayCountBasis::Actual360),
            3 => Ok(DayCountBasis::Actual365),
            4 => Ok(DayCountBasis::European30_360),
            5 => Ok(DayCountBasis::European30Plus360),
            other => Err(Error::UnknownBasis(other)),
        }
    }
}

impl fmt::Display for DayCountBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayCountBasis::Msrb30_360 => "30/360 (MSRB)",
            DayCountBasis::ActualActual => "Actual/Actual",
            DayCountBasis::Actual360 => "Actual/360",
            DayCountBasis::Actual365 => "Actual/365",
            DayCountBasis::European30_360 => "30E/360",
            DayCountBasis::European30Plus360 => "30E+/360",
        };
        write!(f, "{}", name)
    }
}
