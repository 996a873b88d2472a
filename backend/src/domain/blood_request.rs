//! Blood requests raised by users and closed by dispatch or donation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BloodType, Username};

/// Identifier of a blood request (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Mint a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// How quickly a request needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Raised when an urgency or status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {label}")]
pub struct ParseLabelError {
    kind: &'static str,
    label: String,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Urgency {
    type Err = ParseLabelError;

    /// Labels match case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseLabelError {
                kind: "urgency",
                label: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Urgency {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Urgency> for String {
    fn from(value: Urgency) -> Self {
        value.label().to_owned()
    }
}

/// Lifecycle state of a request.
///
/// `Open` is the only non-terminal state. `Cancelled` is never stored since
/// cancelling removes the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequestStatus {
    Open,
    Dispatched,
    DonatedStocked,
    Cancelled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Dispatched => "Dispatched",
            Self::DonatedStocked => "Donated/Stocked",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            // "Fulfilled" is the legacy label for a dispatched request.
            "Dispatched" | "Fulfilled" => Ok(Self::Dispatched),
            "Donated/Stocked" => Ok(Self::DonatedStocked),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(ParseLabelError {
                kind: "status",
                label: other.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestStatus> for String {
    fn from(value: RequestStatus) -> Self {
        value.label().to_owned()
    }
}

/// A request for units of one blood type.
///
/// ## Invariants
/// - `quantity` is strictly positive.
/// - Once `status` leaves `Open` it never returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: RequestId,
    pub requester: Username,
    pub blood_type: BloodType,
    pub quantity: u32,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl BloodRequest {
    /// Build a new open request.
    pub fn open(
        requester: Username,
        blood_type: BloodType,
        quantity: u32,
        urgency: Urgency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::random(),
            requester,
            blood_type,
            quantity,
            urgency,
            status: RequestStatus::Open,
            created_at,
        }
    }

    pub fn is_owned_by(&self, username: &Username) -> bool {
        &self.requester == username
    }
}
