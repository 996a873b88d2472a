//! Mutex-guarded request ledger.
//!
//! Requests are kept in insertion order, which is the order `list` returns.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{RequestRepository, RequestRepositoryError};
use crate::domain::{BloodRequest, RequestId, RequestStatus};

use super::poisoned;

/// Volatile [`RequestRepository`].
#[derive(Debug, Default)]
pub struct MemoryRequestRepository {
    requests: Mutex<Vec<BloodRequest>>,
}

impl MemoryRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<BloodRequest>>, RequestRepositoryError> {
        self.requests
            .lock()
            .map_err(|_| RequestRepositoryError::connection(poisoned("request")))
    }
}

fn check_status(
    request: &BloodRequest,
    expected: RequestStatus,
) -> Result<(), RequestRepositoryError> {
    if request.status == expected {
        Ok(())
    } else {
        Err(RequestRepositoryError::status_mismatch(
            request.id,
            expected,
            request.status,
        ))
    }
}

#[async_trait]
impl RequestRepository for MemoryRequestRepository {
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestRepositoryError> {
        let mut requests = self.lock()?;
        if let Some(stored) = requests.iter_mut().find(|stored| stored.id == request.id) {
            *stored = request.clone();
        } else {
            requests.push(request.clone());
        }
        Ok(())
    }

    async fn find(&self, id: &RequestId) -> Result<Option<BloodRequest>, RequestRepositoryError> {
        Ok(self.lock()?.iter().find(|request| request.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<BloodRequest>, RequestRepositoryError> {
        Ok(self.lock()?.to_vec())
    }

    async fn update_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
        expected: Option<RequestStatus>,
    ) -> Result<(), RequestRepositoryError> {
        let mut requests = self.lock()?;
        let request = requests
            .iter_mut()
            .find(|request| request.id == *id)
            .ok_or(RequestRepositoryError::NotFound { id: *id })?;
        if let Some(expected) = expected {
            check_status(request, expected)?;
        }
        request.status = status;
        Ok(())
    }

    async fn delete(
        &self,
        id: &RequestId,
        expected: RequestStatus,
    ) -> Result<(), RequestRepositoryError> {
        let mut requests = self.lock()?;
        let (position, request) = requests
            .iter()
            .enumerate()
            .find(|(_, request)| request.id == *id)
            .ok_or(RequestRepositoryError::NotFound { id: *id })?;
        check_status(request, expected)?;
        requests.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{BloodType, Urgency, Username};

    #[fixture]
    fn request() -> BloodRequest {
        BloodRequest::open(
            Username::new("ann").expect("username"),
            BloodType::OPositive,
            5,
            Urgency::High,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
                .single()
                .expect("timestamp"),
        )
    }

    fn reopened_as(request: &BloodRequest, requester: &str) -> BloodRequest {
        BloodRequest::open(
            Username::new(requester).expect("username"),
            request.blood_type,
            request.quantity,
            request.urgency,
            request.created_at,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn list_keeps_insertion_order_for_equal_timestamps(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        let later = [
            reopened_as(&request, "bob"),
            reopened_as(&request, "cy"),
            reopened_as(&request, "dee"),
        ];
        repo.insert(&request).await.expect("insert");
        for other in &later {
            repo.insert(other).await.expect("insert");
        }

        let requesters: Vec<String> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|stored| stored.requester.to_string())
            .collect();
        assert_eq!(requesters, ["ann", "bob", "cy", "dee"]);
    }

    #[rstest]
    #[tokio::test]
    async fn cancelled_request_leaves_order_of_the_rest(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        let bob = reopened_as(&request, "bob");
        let cy = reopened_as(&request, "cy");
        for stored in [&request, &bob, &cy] {
            repo.insert(stored).await.expect("insert");
        }
        repo.delete(&bob.id, RequestStatus::Open).await.expect("delete");

        let ids: Vec<RequestId> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|stored| stored.id)
            .collect();
        assert_eq!(ids, [request.id, cy.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn conditional_update_rejects_stale_status(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        repo.insert(&request).await.expect("insert");
        repo.update_status(&request.id, RequestStatus::Dispatched, Some(RequestStatus::Open))
            .await
            .expect("first transition");

        let err = repo
            .update_status(&request.id, RequestStatus::Dispatched, Some(RequestStatus::Open))
            .await
            .expect_err("second transition");
        assert_eq!(
            err,
            RequestRepositoryError::status_mismatch(
                request.id,
                RequestStatus::Open,
                RequestStatus::Dispatched,
            )
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unconditional_update_overwrites_terminal_status(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        repo.insert(&request).await.expect("insert");
        repo.update_status(&request.id, RequestStatus::Dispatched, None)
            .await
            .expect("dispatch");
        repo.update_status(&request.id, RequestStatus::DonatedStocked, None)
            .await
            .expect("overwrite");

        let stored = repo.find(&request.id).await.expect("find").expect("present");
        assert_eq!(stored.status, RequestStatus::DonatedStocked);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_keeps_closed_requests(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        repo.insert(&request).await.expect("insert");
        repo.update_status(&request.id, RequestStatus::Dispatched, None)
            .await
            .expect("dispatch");

        assert!(repo.delete(&request.id, RequestStatus::Open).await.is_err());
        assert!(repo.find(&request.id).await.expect("find").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_request_is_not_found(request: BloodRequest) {
        let repo = MemoryRequestRepository::new();
        let err = repo
            .delete(&request.id, RequestStatus::Open)
            .await
            .expect_err("missing");
        assert_eq!(err, RequestRepositoryError::not_found(request.id));
    }
}
