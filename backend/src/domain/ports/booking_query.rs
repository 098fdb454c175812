//! Driving port for booking lookups.

use async_trait::async_trait;

use crate::domain::{BookingDetails, BookingId, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch a booking owned by `owner`. Foreign and absent bookings both
    /// fail with not found.
    async fn find_booking(&self, booking_id: BookingId, owner: UserId)
    -> Result<BookingDetails, Error>;
}
