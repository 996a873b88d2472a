//! Failure taxonomy of the reconciliation engine and its mapping onto the
//! transport-agnostic [`Error`] envelope.

use serde_json::json;

use crate::domain::ports::{AccountRepositoryError, InventoryRepositoryError, RequestRepositoryError};
use crate::domain::{BloodType, Error, RequestId, RequestStatus, Role};

/// Why a blood bank operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    #[error("quantity must be a positive number of units, got {quantity}")]
    InvalidQuantity { quantity: i64 },
    #[error("insufficient {blood_type} stock: {available} available, {requested} requested")]
    InsufficientStock {
        blood_type: BloodType,
        available: u32,
        requested: u64,
    },
    #[error("request {id} not found")]
    NotFound { id: RequestId },
    #[error("{role} login required")]
    Unauthorized { role: Role },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{reason}")]
    Forbidden { reason: &'static str },
    #[error("request {id} is {status}; only open requests can change")]
    InvalidState { id: RequestId, status: RequestStatus },
    #[error("donor is not eligible for another {days_remaining} days")]
    NotEligible { days_remaining: u32 },
    #[error("you cannot donate to your own request")]
    SelfDonationForbidden,
    #[error("{role} {username} already exists")]
    AlreadyExists { role: Role, username: String },
    #[error("backing store unavailable: {message}")]
    Unavailable { message: String },
    #[error("backing store failure: {message}")]
    Storage { message: String },
}

impl ReconciliationError {
    /// Stable reason code placed in `details.code`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::NotFound { .. } => "request_not_found",
            Self::Unauthorized { .. } => "login_required",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Forbidden { .. } => "not_request_owner",
            Self::InvalidState { .. } => "invalid_state",
            Self::NotEligible { .. } => "not_eligible",
            Self::SelfDonationForbidden => "self_donation",
            Self::AlreadyExists { .. } => "already_exists",
            Self::Unavailable { .. } => "store_unavailable",
            Self::Storage { .. } => "store_failure",
        }
    }
}

impl From<ReconciliationError> for Error {
    fn from(value: ReconciliationError) -> Self {
        let reason = value.reason();
        let message = value.to_string();
        let error = match &value {
            ReconciliationError::InvalidQuantity { quantity } => {
                return Error::invalid_request(message)
                    .with_details(json!({ "code": reason, "quantity": quantity }));
            }
            ReconciliationError::InsufficientStock {
                blood_type,
                available,
                requested,
            } => {
                return Error::invalid_request(message).with_details(json!({
                    "code": reason,
                    "bloodType": blood_type,
                    "available": available,
                    "requested": requested,
                }));
            }
            ReconciliationError::NotEligible { days_remaining } => {
                return Error::invalid_request(message)
                    .with_details(json!({ "code": reason, "daysRemaining": days_remaining }));
            }
            ReconciliationError::Unauthorized { .. } | ReconciliationError::InvalidCredentials => {
                Error::unauthorized(message)
            }
            ReconciliationError::Forbidden { .. } | ReconciliationError::SelfDonationForbidden => {
                Error::forbidden(message)
            }
            ReconciliationError::NotFound { .. } => Error::not_found(message),
            ReconciliationError::InvalidState { .. } | ReconciliationError::AlreadyExists { .. } => {
                Error::conflict(message)
            }
            ReconciliationError::Unavailable { .. } => Error::service_unavailable(message),
            ReconciliationError::Storage { .. } => Error::internal(message),
        };
        error.with_details(json!({ "code": reason }))
    }
}

impl From<InventoryRepositoryError> for ReconciliationError {
    fn from(value: InventoryRepositoryError) -> Self {
        match value {
            InventoryRepositoryError::Connection { message } => Self::Unavailable { message },
            InventoryRepositoryError::Query { message } => Self::Storage { message },
            InventoryRepositoryError::InsufficientStock {
                blood_type,
                available,
                requested,
            } => Self::InsufficientStock {
                blood_type,
                available,
                requested,
            },
        }
    }
}

impl From<RequestRepositoryError> for ReconciliationError {
    fn from(value: RequestRepositoryError) -> Self {
        match value {
            RequestRepositoryError::Connection { message } => Self::Unavailable { message },
            RequestRepositoryError::Query { message } => Self::Storage { message },
            RequestRepositoryError::NotFound { id } => Self::NotFound { id },
            RequestRepositoryError::StatusMismatch { id, actual, .. } => Self::InvalidState {
                id,
                status: actual,
            },
        }
    }
}

impl From<AccountRepositoryError> for ReconciliationError {
    fn from(value: AccountRepositoryError) -> Self {
        match value {
            AccountRepositoryError::Connection { message } => Self::Unavailable { message },
            AccountRepositoryError::Query { message } => Self::Storage { message },
            AccountRepositoryError::Duplicate { username } => Self::AlreadyExists {
                role: Role::User,
                username,
            },
            AccountRepositoryError::UnknownAccount { .. } => Self::Unauthorized { role: Role::User },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn id() -> RequestId {
        RequestId::random()
    }

    #[rstest]
    #[case(ReconciliationError::InvalidQuantity { quantity: 0 }, ErrorCode::InvalidRequest)]
    #[case(
        ReconciliationError::InsufficientStock {
            blood_type: BloodType::OPositive,
            available: 2,
            requested: 5,
        },
        ErrorCode::InvalidRequest
    )]
    #[case(ReconciliationError::NotEligible { days_remaining: 3 }, ErrorCode::InvalidRequest)]
    #[case(ReconciliationError::Unauthorized { role: Role::Admin }, ErrorCode::Unauthorized)]
    #[case(ReconciliationError::InvalidCredentials, ErrorCode::Unauthorized)]
    #[case(ReconciliationError::Forbidden { reason: "not yours" }, ErrorCode::Forbidden)]
    #[case(ReconciliationError::SelfDonationForbidden, ErrorCode::Forbidden)]
    #[case(ReconciliationError::NotFound { id: id() }, ErrorCode::NotFound)]
    #[case(
        ReconciliationError::InvalidState { id: id(), status: RequestStatus::Dispatched },
        ErrorCode::Conflict
    )]
    #[case(
        ReconciliationError::AlreadyExists { role: Role::User, username: "ann".into() },
        ErrorCode::Conflict
    )]
    #[case(
        ReconciliationError::Unavailable { message: "pool".into() },
        ErrorCode::ServiceUnavailable
    )]
    #[case(ReconciliationError::Storage { message: "sql".into() }, ErrorCode::InternalError)]
    fn maps_to_envelope_code(#[case] error: ReconciliationError, #[case] expected: ErrorCode) {
        let reason = error.reason();
        let envelope = Error::from(error);
        assert_eq!(envelope.code(), expected);
        assert_eq!(
            envelope.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some(reason)
        );
    }

    #[rstest]
    fn insufficient_stock_details_name_the_shortfall() {
        let envelope = Error::from(ReconciliationError::InsufficientStock {
            blood_type: BloodType::AbNegative,
            available: 1,
            requested: 4,
        });
        let details = envelope.details().expect("details");
        assert_eq!(details["bloodType"], "AB-");
        assert_eq!(details["available"], 1);
        assert_eq!(details["requested"], 4);
    }

    #[rstest]
    fn inventory_shortfall_maps_through() {
        let mapped = ReconciliationError::from(InventoryRepositoryError::insufficient_stock(
            BloodType::BPositive,
            1_u32,
            3_u64,
        ));
        assert_eq!(
            mapped,
            ReconciliationError::InsufficientStock {
                blood_type: BloodType::BPositive,
                available: 1,
                requested: 3,
            }
        );
    }
}
