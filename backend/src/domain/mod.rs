//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: define the strongly typed vocabulary of the blood bank (blood
//! types, requests, accounts, stock) and the reconciliation rules that move
//! units between requests and inventory. Nothing here knows about HTTP or
//! SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error envelope.
//! - ReconciliationEngine: stock and request use-cases.
//! - IdentityService: signup and login for both account tables.

pub mod account;
pub mod blood_request;
pub mod blood_type;
pub mod eligibility;
pub mod error;
pub mod identity_service;
pub mod inventory;
pub mod notifications;
pub mod ports;
pub mod reconciliation;
pub mod trace_id;

pub use self::account::{
    Actor, AdminAccount, Credentials, CredentialsValidationError, Role, UserAccount, Username,
};
pub use self::blood_request::{
    BloodRequest, ParseLabelError, RequestId, RequestStatus, Urgency,
};
pub use self::blood_type::{BloodType, ParseBloodTypeError};
pub use self::eligibility::{DONATION_COOLDOWN_DAYS, Eligibility};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_service::IdentityService;
pub use self::inventory::{InventoryLevels, InventoryUpdate, LOW_STOCK_THRESHOLD};
pub use self::notifications::Notice;
pub use self::reconciliation::{ReconciliationEngine, ReconciliationError};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bloodbridge::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
