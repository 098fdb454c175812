//! Driving port for catalogue mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewTrain, Train};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainCatalogueCommand: Send + Sync {
    /// Add a train route. Duplicate train numbers are a conflict.
    async fn create_train(&self, train: NewTrain) -> Result<Train, Error>;
}
