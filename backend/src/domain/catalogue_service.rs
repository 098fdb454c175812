//! Train catalogue services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AvailabilityQuery, TrainCatalogueCommand, TrainRepository, TrainRepositoryError,
};
use crate::domain::{Error, NewTrain, RouteQuery, Train, TrainAvailability};

fn map_repository_error(error: TrainRepositoryError) -> Error {
    match error {
        TrainRepositoryError::DuplicateTrainNumber => Error::conflict("Train number already exists")
            .with_details(json!({ "field": "trainNumber", "code": "duplicate_train_number" })),
        TrainRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("train repository unavailable: {message}"))
        }
        TrainRepositoryError::Query { message } => {
            Error::internal(format!("train repository error: {message}"))
        }
    }
}

/// Service implementing catalogue commands and the availability report.
#[derive(Clone)]
pub struct CatalogueService<T> {
    trains: Arc<T>,
}

impl<T> CatalogueService<T> {
    pub fn new(trains: Arc<T>) -> Self {
        Self { trains }
    }
}

#[async_trait]
impl<T> TrainCatalogueCommand for CatalogueService<T>
where
    T: TrainRepository,
{
    async fn create_train(&self, train: NewTrain) -> Result<Train, Error> {
        let created = self
            .trains
            .create(&train)
            .await
            .map_err(map_repository_error)?;
        info!(
            train_id = %created.id,
            train_number = created.train_number.as_ref(),
            total_seats = created.total_seats.get(),
            "train created"
        );
        Ok(created)
    }
}

#[async_trait]
impl<T> AvailabilityQuery for CatalogueService<T>
where
    T: TrainRepository,
{
    async fn availability(&self, route: RouteQuery) -> Result<Vec<TrainAvailability>, Error> {
        self.trains
            .availability(&route)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTrainRepository;
    use crate::domain::{ErrorCode, SeatCapacity, StationName, TrainId, TrainNumber};
    use rstest::rstest;

    fn sample_train() -> Train {
        Train {
            id: TrainId::new(5).expect("id"),
            train_number: TrainNumber::new("ICE-9").expect("number"),
            source: StationName::new("Paris", "source").expect("source"),
            destination: StationName::new("Lyon", "destination").expect("destination"),
            total_seats: SeatCapacity::new(2).expect("seats"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_train_returns_stored_record() {
        let mut repo = MockTrainRepository::new();
        repo.expect_create()
            .withf(|train| train.train_number.as_ref() == "ICE-9")
            .times(1)
            .returning(|_| Ok(sample_train()));
        let service = CatalogueService::new(Arc::new(repo));

        let new_train =
            NewTrain::try_from_parts("ICE-9", "Paris", "Lyon", 2).expect("valid train");
        let created = service.create_train(new_train).await.expect("created");
        assert_eq!(created, sample_train());
    }

    #[rstest]
    #[case(TrainRepositoryError::duplicate_train_number(), ErrorCode::Conflict)]
    #[case(TrainRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(TrainRepositoryError::query("bad column"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn create_train_maps_errors(
        #[case] failure: TrainRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockTrainRepository::new();
        repo.expect_create()
            .returning(move |_| Err(failure.clone()));
        let service = CatalogueService::new(Arc::new(repo));

        let new_train =
            NewTrain::try_from_parts("ICE-9", "Paris", "Lyon", 2).expect("valid train");
        let err = service.create_train(new_train).await.expect_err("failure");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn availability_passes_route_through() {
        let mut repo = MockTrainRepository::new();
        repo.expect_availability()
            .withf(|route| route.source.as_ref() == "paris" && route.destination.as_ref() == "LYON")
            .returning(|_| Ok(vec![TrainAvailability::from_booked(sample_train(), 1)]));
        let service = CatalogueService::new(Arc::new(repo));

        let route = RouteQuery::try_from_parts("paris", "LYON").expect("route");
        let report = service.availability(route).await.expect("report");
        assert_eq!(report.len(), 1);
        assert_eq!(report.first().map(|row| row.available_seats), Some(1));
    }
}
