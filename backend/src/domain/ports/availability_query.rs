//! Driving port for the read-only availability report.

use async_trait::async_trait;

use crate::domain::{Error, RouteQuery, TrainAvailability};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    /// Trains on a route that still have free seats.
    async fn availability(&self, route: RouteQuery) -> Result<Vec<TrainAvailability>, Error>;
}
