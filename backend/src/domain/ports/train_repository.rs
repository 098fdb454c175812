//! Port for the train catalogue store.
use async_trait::async_trait;

use crate::domain::{NewTrain, RouteQuery, Train, TrainAvailability, TrainId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by train repository adapters.
    pub enum TrainRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "train repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "train repository query failed: {message}",
        /// The train number is already registered.
        DuplicateTrainNumber => "train number already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainRepository: Send + Sync {
    /// Insert a train, failing with `DuplicateTrainNumber` on a clash.
    async fn create(&self, train: &NewTrain) -> Result<Train, TrainRepositoryError>;

    /// Fetch a train without locking it.
    async fn find_by_id(&self, id: TrainId) -> Result<Option<Train>, TrainRepositoryError>;

    /// Trains on the route with at least one free seat, ordered by id.
    async fn availability(
        &self,
        route: &RouteQuery,
    ) -> Result<Vec<TrainAvailability>, TrainRepositoryError>;
}
