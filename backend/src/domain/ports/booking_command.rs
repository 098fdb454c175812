//! Driving port for seat allocation.

use async_trait::async_trait;

use crate::domain::{Booking, Error, TrainId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve one seat on `train_id` for `user_id`.
    async fn book_seat(&self, train_id: TrainId, user_id: UserId) -> Result<Booking, Error>;
}
