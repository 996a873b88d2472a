//! Driven port for the request ledger.

use async_trait::async_trait;

use crate::domain::{BloodRequest, RequestId, RequestStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by request repository adapters.
    pub enum RequestRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "request repository query failed: {message}",
        /// No request has the given identifier.
        NotFound { id: RequestId } => "request {id} not found",
        /// The stored status differed from the caller's expectation.
        StatusMismatch { id: RequestId, expected: RequestStatus, actual: RequestStatus } =>
            "request {id} is {actual}, expected {expected}",
    }
}

/// Storage of blood requests keyed by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Store a new request.
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestRepositoryError>;

    /// Fetch a request by identifier.
    async fn find(&self, id: &RequestId) -> Result<Option<BloodRequest>, RequestRepositoryError>;

    /// Every stored request. Callers must not rely on the order.
    async fn list(&self) -> Result<Vec<BloodRequest>, RequestRepositoryError>;

    /// Write `status`, optionally only when the stored status equals `expected`.
    async fn update_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
        expected: Option<RequestStatus>,
    ) -> Result<(), RequestRepositoryError>;

    /// Remove a request while its stored status equals `expected`.
    async fn delete(
        &self,
        id: &RequestId,
        expected: RequestStatus,
    ) -> Result<(), RequestRepositoryError>;
}
