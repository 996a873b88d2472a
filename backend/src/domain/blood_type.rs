//! ABO/Rh blood groups tracked by the inventory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of blood types held in stock.
///
/// Variants are declared in canonical order, so `Ord` and [`BloodType::ALL`]
/// agree. Labels use ASCII signs (`O+`, `AB-`); parsing also accepts the
/// Unicode minus sign.
///
/// # Examples
/// ```
/// use bloodbridge::domain::BloodType;
///
/// let bt: BloodType = "AB-".parse().unwrap();
/// assert_eq!(bt, BloodType::AbNegative);
/// assert_eq!(bt.to_string(), "AB-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodType {
    OPositive,
    ONegative,
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
}

/// Raised when a label does not name a known blood type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood type: {label}")]
pub struct ParseBloodTypeError {
    label: String,
}

impl ParseBloodTypeError {
    /// The rejected input.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl BloodType {
    /// Every blood type in canonical order.
    pub const ALL: [BloodType; 8] = [
        Self::OPositive,
        Self::ONegative,
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    /// Canonical ASCII label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().replace('\u{2212}', "-").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|bt| bt.label() == normalised)
            .ok_or_else(|| ParseBloodTypeError {
                label: s.to_owned(),
            })
    }
}

impl TryFrom<String> for BloodType {
    type Error = ParseBloodTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodType> for String {
    fn from(value: BloodType) -> Self {
        value.label().to_owned()
    }
}
