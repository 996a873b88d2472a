//! PostgreSQL-backed `RequestRepository` implementation using Diesel ORM.
//!
//! Conditional status writes and deletes filter on the stored status. When
//! no row matches, a follow-up read distinguishes a missing request from a
//! status mismatch.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RequestRepository, RequestRepositoryError};
use crate::domain::{BloodRequest, RequestId, RequestStatus, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, stored_count};
use super::models::{BloodRequestRow, NewBloodRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::blood_requests;

/// Diesel-backed implementation of the `RequestRepository` port.
#[derive(Clone)]
pub struct DieselRequestRepository {
    pool: DbPool,
}

impl DieselRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RequestRepositoryError {
    map_pool_error(error, RequestRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RequestRepositoryError {
    map_diesel_error(
        error,
        RequestRepositoryError::query,
        RequestRepositoryError::connection,
    )
}

fn corrupt(field: &str, value: &str) -> RequestRepositoryError {
    RequestRepositoryError::query(format!("stored request has invalid {field}: {value}"))
}

fn row_to_request(row: BloodRequestRow) -> Result<BloodRequest, RequestRepositoryError> {
    Ok(BloodRequest {
        id: RequestId::from_uuid(row.id),
        requester: Username::new(&row.requester).map_err(|_| corrupt("requester", &row.requester))?,
        blood_type: row
            .blood_type
            .parse()
            .map_err(|_| corrupt("blood type", &row.blood_type))?,
        quantity: stored_count(row.quantity, RequestRepositoryError::query)?,
        urgency: row
            .urgency
            .parse()
            .map_err(|_| corrupt("urgency", &row.urgency))?,
        status: row
            .status
            .parse()
            .map_err(|_| corrupt("status", &row.status))?,
        created_at: row.created_at,
    })
}

impl DieselRequestRepository {
    /// Explain why a conditional write touched no rows.
    async fn missed_write<C>(
        conn: &mut C,
        id: &RequestId,
        expected: Option<RequestStatus>,
    ) -> RequestRepositoryError
    where
        C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
    {
        let stored: Result<Option<String>, _> = blood_requests::table
            .filter(blood_requests::id.eq(id.as_uuid()))
            .select(blood_requests::status)
            .first(conn)
            .await
            .optional();
        match (stored, expected) {
            (Ok(None), _) | (Ok(Some(_)), None) => RequestRepositoryError::not_found(*id),
            (Ok(Some(label)), Some(expected)) => match label.parse::<RequestStatus>() {
                Ok(actual) => RequestRepositoryError::status_mismatch(*id, expected, actual),
                Err(_) => corrupt("status", &label),
            },
            (Err(error), _) => diesel_error(error),
        }
    }
}

#[async_trait]
impl RequestRepository for DieselRequestRepository {
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewBloodRequestRow {
            id: *request.id.as_uuid(),
            requester: request.requester.as_ref(),
            blood_type: request.blood_type.label(),
            quantity: i64::from(request.quantity),
            urgency: request.urgency.label(),
            status: request.status.label(),
            created_at: request.created_at,
        };
        diesel::insert_into(blood_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find(&self, id: &RequestId) -> Result<Option<BloodRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<BloodRequestRow> = blood_requests::table
            .filter(blood_requests::id.eq(id.as_uuid()))
            .select(BloodRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn list(&self) -> Result<Vec<BloodRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BloodRequestRow> = blood_requests::table
            .order_by((blood_requests::created_at.asc(), blood_requests::id.asc()))
            .select(BloodRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_request).collect()
    }

    async fn update_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
        expected: Option<RequestStatus>,
    ) -> Result<(), RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = blood_requests::table.filter(blood_requests::id.eq(id.as_uuid()));
        let updated = match expected {
            Some(expected) => {
                diesel::update(target.filter(blood_requests::status.eq(expected.label())))
                    .set(blood_requests::status.eq(status.label()))
                    .execute(&mut conn)
                    .await
            }
            None => {
                diesel::update(target)
                    .set(blood_requests::status.eq(status.label()))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(diesel_error)?;

        if updated == 0 {
            return Err(Self::missed_write(&mut conn, id, expected).await);
        }
        Ok(())
    }

    async fn delete(
        &self,
        id: &RequestId,
        expected: RequestStatus,
    ) -> Result<(), RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            blood_requests::table
                .filter(blood_requests::id.eq(id.as_uuid()))
                .filter(blood_requests::status.eq(expected.label())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        if deleted == 0 {
            return Err(Self::missed_write(&mut conn, id, Some(expected)).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::{BloodType, Urgency};

    #[fixture]
    fn row() -> BloodRequestRow {
        BloodRequestRow {
            id: Uuid::new_v4(),
            requester: "ann".to_owned(),
            blood_type: "AB-".to_owned(),
            quantity: 5,
            urgency: "High".to_owned(),
            status: "Donated/Stocked".to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[rstest]
    fn converts_stored_labels(row: BloodRequestRow) {
        let request = row_to_request(row).expect("valid row");
        assert_eq!(request.blood_type, BloodType::AbNegative);
        assert_eq!(request.urgency, Urgency::High);
        assert_eq!(request.status, RequestStatus::DonatedStocked);
        assert_eq!(request.quantity, 5);
    }

    #[rstest]
    fn legacy_fulfilled_rows_read_as_dispatched(mut row: BloodRequestRow) {
        row.status = "Fulfilled".to_owned();
        let request = row_to_request(row).expect("valid row");
        assert_eq!(request.status, RequestStatus::Dispatched);
    }

    #[rstest]
    #[case::blood_type("blood type")]
    #[case::quantity("quantity")]
    fn rejects_corrupt_rows(mut row: BloodRequestRow, #[case] field: &str) {
        match field {
            "blood type" => row.blood_type = "Z+".to_owned(),
            _ => row.quantity = -1,
        }
        assert!(matches!(
            row_to_request(row),
            Err(RequestRepositoryError::Query { .. })
        ));
    }
}
