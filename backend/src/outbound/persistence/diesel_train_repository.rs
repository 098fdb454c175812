//! PostgreSQL-backed train catalogue.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TrainRepository, TrainRepositoryError};
use crate::domain::{NewTrain, RouteQuery, Train, TrainAvailability, TrainId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::{NewTrainRow, TrainRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, trains};

diesel::define_sql_function!(fn lower(value: Text) -> Text);

/// Diesel-backed implementation of [`TrainRepository`].
#[derive(Clone)]
pub struct DieselTrainRepository {
    pool: DbPool,
}

impl DieselTrainRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TrainRepositoryError {
    TrainRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> TrainRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::UniqueViolation { .. } => TrainRepositoryError::duplicate_train_number(),
        DieselFailure::Connection(message) => TrainRepositoryError::connection(message),
        DieselFailure::LockTimeout | DieselFailure::Serialization => {
            TrainRepositoryError::connection(format!("{operation}: transient conflict"))
        }
        DieselFailure::Query(message) => TrainRepositoryError::query(message),
    }
}

fn to_train(row: TrainRow) -> Result<Train, TrainRepositoryError> {
    Train::try_from(row).map_err(TrainRepositoryError::query)
}

#[async_trait]
impl TrainRepository for DieselTrainRepository {
    async fn create(&self, train: &NewTrain) -> Result<Train, TrainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTrainRow {
            train_number: train.train_number.as_ref(),
            source: train.source.as_ref(),
            destination: train.destination.as_ref(),
            total_seats: train.total_seats.get(),
        };

        let stored: TrainRow = diesel::insert_into(trains::table)
            .values(&row)
            .returning(TrainRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert train"))?;
        to_train(stored)
    }

    async fn find_by_id(&self, id: TrainId) -> Result<Option<Train>, TrainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TrainRow> = trains::table
            .find(id.get())
            .select(TrainRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "select train"))?;
        row.map(to_train).transpose()
    }

    async fn availability(
        &self,
        route: &RouteQuery,
    ) -> Result<Vec<TrainAvailability>, TrainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let source = route.source.as_ref().to_lowercase();
        let destination = route.destination.as_ref().to_lowercase();

        let rows: Vec<TrainRow> = trains::table
            .filter(lower(trains::source).eq(source))
            .filter(lower(trains::destination).eq(destination))
            .order_by(trains::id)
            .select(TrainRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "select route trains"))?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let counts: HashMap<i32, i64> = bookings::table
            .filter(bookings::train_id.eq_any(ids))
            .group_by(bookings::train_id)
            .select((bookings::train_id, count_star()))
            .load::<(i32, i64)>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count bookings"))?
            .into_iter()
            .collect();

        let mut report = Vec::with_capacity(rows.len());
        for row in rows {
            let booked = counts.get(&row.id).copied().unwrap_or(0);
            let availability = TrainAvailability::from_booked(to_train(row)?, booked);
            if availability.available_seats > 0 {
                report.push(availability);
            }
        }
        Ok(report)
    }
}
