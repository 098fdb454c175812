//! Seat assignment under the per-train allocation lock.
//!
//! Adapters read the train capacity and the seats already taken while they
//! hold the train's exclusive lock, then ask [`SeatMap::next_free`] which
//! seat to write. The function is pure so both the Diesel and in-memory
//! ledgers share one policy.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::booking::SeatNumber;
use super::train::SeatCapacity;

/// How the next seat number is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatAssignmentPolicy {
    /// Lowest positive seat not yet taken, reusing gaps.
    #[default]
    LowestFree,
    /// One past the highest seat taken; gaps are never reused.
    Monotonic,
}

impl fmt::Display for SeatAssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LowestFree => "lowest_free",
            Self::Monotonic => "monotonic",
        })
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown seat policy `{0}`; expected `lowest_free` or `monotonic`")]
pub struct UnknownSeatPolicy(pub String);

impl FromStr for SeatAssignmentPolicy {
    type Err = UnknownSeatPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lowest_free" => Ok(Self::LowestFree),
            "monotonic" => Ok(Self::Monotonic),
            other => Err(UnknownSeatPolicy(other.to_owned())),
        }
    }
}

/// The train has no seat left under the active policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no seats available")]
pub struct SoldOut;

/// Seats already taken on one train.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatMap {
    taken: BTreeSet<i32>,
}

impl SeatMap {
    pub fn new(taken: impl IntoIterator<Item = i32>) -> Self {
        Self {
            taken: taken.into_iter().collect(),
        }
    }

    /// Number of seats booked.
    #[must_use]
    pub fn booked(&self) -> usize {
        self.taken.len()
    }

    /// Choose the seat for the next booking.
    ///
    /// The booked count is compared against capacity first, so a full train
    /// is reported as sold out even when stored seat numbers are sparse.
    ///
    /// # Examples
    /// ```
    /// use booking_backend::domain::{SeatAssignmentPolicy, SeatCapacity, SeatMap};
    ///
    /// let map = SeatMap::new([1, 2, 4]);
    /// let capacity = SeatCapacity::new(5).unwrap();
    /// let seat = map.next_free(capacity, SeatAssignmentPolicy::LowestFree).unwrap();
    /// assert_eq!(seat.get(), 3);
    /// ```
    pub fn next_free(
        &self,
        capacity: SeatCapacity,
        policy: SeatAssignmentPolicy,
    ) -> Result<SeatNumber, SoldOut> {
        let capacity = capacity.get();
        let booked = i64::try_from(self.taken.len()).map_err(|_| SoldOut)?;
        if booked >= i64::from(capacity) {
            return Err(SoldOut);
        }

        let candidate = match policy {
            SeatAssignmentPolicy::LowestFree => {
                (1..=capacity).find(|seat| !self.taken.contains(seat))
            }
            SeatAssignmentPolicy::Monotonic => {
                let next = self.taken.last().copied().unwrap_or(0).saturating_add(1);
                (next <= capacity).then_some(next)
            }
        };

        candidate
            .and_then(|seat| SeatNumber::new(seat).ok())
            .ok_or(SoldOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn capacity(seats: i32) -> SeatCapacity {
        SeatCapacity::new(seats).expect("capacity")
    }

    #[rstest]
    #[case(&[], 5, Some(1))]
    #[case(&[1, 2, 4], 5, Some(3))]
    #[case(&[2, 3], 3, Some(1))]
    #[case(&[1, 2, 3], 3, None)]
    #[case(&[], 1, Some(1))]
    #[case(&[1], 1, None)]
    fn lowest_free_fills_gaps(
        #[case] taken: &[i32],
        #[case] seats: i32,
        #[case] expected: Option<i32>,
    ) {
        let seat = SeatMap::new(taken.iter().copied())
            .next_free(capacity(seats), SeatAssignmentPolicy::LowestFree)
            .ok()
            .map(SeatNumber::get);
        assert_eq!(seat, expected);
    }

    #[rstest]
    #[case(&[], 5, Some(1))]
    #[case(&[1, 2, 4], 5, Some(5))]
    #[case(&[1, 3], 3, None)]
    #[case(&[3], 3, None)]
    fn monotonic_never_reuses_gaps(
        #[case] taken: &[i32],
        #[case] seats: i32,
        #[case] expected: Option<i32>,
    ) {
        let seat = SeatMap::new(taken.iter().copied())
            .next_free(capacity(seats), SeatAssignmentPolicy::Monotonic)
            .ok()
            .map(SeatNumber::get);
        assert_eq!(seat, expected);
    }

    #[rstest]
    fn count_check_precedes_gap_scan() {
        // Capacity shrank below stored seats: still sold out.
        let map = SeatMap::new([5, 6]);
        assert_eq!(
            map.next_free(capacity(2), SeatAssignmentPolicy::LowestFree),
            Err(SoldOut)
        );
    }

    #[rstest]
    #[case("lowest_free", SeatAssignmentPolicy::LowestFree)]
    #[case("Lowest-Free", SeatAssignmentPolicy::LowestFree)]
    #[case(" monotonic ", SeatAssignmentPolicy::Monotonic)]
    fn policy_parses_names(#[case] raw: &str, #[case] expected: SeatAssignmentPolicy) {
        assert_eq!(raw.parse::<SeatAssignmentPolicy>(), Ok(expected));
    }

    #[rstest]
    fn policy_rejects_unknown_names() {
        assert!("random".parse::<SeatAssignmentPolicy>().is_err());
    }

    #[rstest]
    fn default_policy_is_lowest_free() {
        assert_eq!(SeatAssignmentPolicy::default(), SeatAssignmentPolicy::LowestFree);
    }
}
