//! Parsing of raw request fields into domain values.
//!
//! Failures become `invalid_request` errors whose `details` name the field,
//! echo the rejected value and carry a machine-readable `code`.

use std::collections::BTreeMap;

use serde_json::json;

use crate::domain::{
    BloodType, Credentials, CredentialsValidationError, Error, InventoryUpdate, RequestId,
    Urgency,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    EmptyUsername,
    EmptyPassword,
    InvalidBloodType,
    InvalidUrgency,
    InvalidUuid,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
            Self::InvalidBloodType => "invalid_blood_type",
            Self::InvalidUrgency => "invalid_urgency",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

fn field_error(field: &str, code: FieldErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field, "value": value, "code": code.as_str() }),
        None => json!({ "field": field, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn parse_credentials(username: &str, password: &str) -> Result<Credentials, Error> {
    Credentials::try_from_parts(username, password).map_err(|err| match err {
        CredentialsValidationError::EmptyUsername => field_error(
            "username",
            FieldErrorCode::EmptyUsername,
            err.to_string(),
            None,
        ),
        CredentialsValidationError::EmptyPassword => field_error(
            "password",
            FieldErrorCode::EmptyPassword,
            err.to_string(),
            None,
        ),
    })
}

pub(crate) fn parse_blood_type(field: &str, value: &str) -> Result<BloodType, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            FieldErrorCode::InvalidBloodType,
            format!("{field} must be one of O+, O-, A+, A-, B+, B-, AB+, AB-"),
            Some(value),
        )
    })
}

pub(crate) fn parse_urgency(value: &str) -> Result<Urgency, Error> {
    value.parse().map_err(|_| {
        field_error(
            "urgency",
            FieldErrorCode::InvalidUrgency,
            "urgency must be one of Low, Medium, High, Critical".to_owned(),
            Some(value),
        )
    })
}

pub(crate) fn parse_request_id(value: &str) -> Result<RequestId, Error> {
    value.parse().map_err(|_| {
        field_error(
            "id",
            FieldErrorCode::InvalidUuid,
            "id must be a valid UUID".to_owned(),
            Some(value),
        )
    })
}

/// Turn a `{ "O+": 12, ... }` body into a bulk update.
///
/// Every key must name a blood type; counts are clamped by
/// [`InventoryUpdate::set`].
pub(crate) fn parse_inventory_update(body: BTreeMap<String, i64>) -> Result<InventoryUpdate, Error> {
    let mut update = InventoryUpdate::new();
    for (label, quantity) in body {
        let blood_type = parse_blood_type(&label, &label)?;
        update.set(blood_type, quantity);
    }
    Ok(update)
}
