//! Single-slot in-flight guard.
//!
//! At most one session operation runs at a time. A submission holds the slot
//! for the whole oracle round trip; captures and retakes hold it only while
//! they apply. The slot is released when the [`InFlightToken`] drops, so an
//! early return or a dropped future cannot leave it stuck.

use kyc_types::Stage;
use std::sync::atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const DOCUMENT: u8 = 1;
const FACE: u8 = 2;

fn encode(stage: Stage) -> u8 {
    match stage {
        Stage::Document => DOCUMENT,
        Stage::Face => FACE,
    }
}

fn decode(value: u8) -> Option<Stage> {
    match value {
        DOCUMENT => Some(Stage::Document),
        FACE => Some(Stage::Face),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    slot: AtomicU8,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `stage`, or report the stage that holds it.
    pub fn try_acquire(&self, stage: Stage) -> Result<InFlightToken<'_>, Stage> {
        self.slot
            .compare_exchange(IDLE, encode(stage), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightToken { guard: self })
            .map_err(|held| decode(held).unwrap_or(stage))
    }

    /// The stage currently holding the slot.
    pub fn current(&self) -> Option<Stage> {
        decode(self.slot.load(Ordering::Acquire))
    }
}

/// Holds the slot until dropped.
#[derive(Debug)]
pub struct InFlightToken<'a> {
    guard: &'a InFlight,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.guard.slot.store(IDLE, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_reports_holder() {
        let in_flight = InFlight::new();
        let token = in_flight.try_acquire(Stage::Document).unwrap();
        assert_eq!(in_flight.current(), Some(Stage::Document));
        assert_eq!(in_flight.try_acquire(Stage::Face).unwrap_err(), Stage::Document);
        assert_eq!(
            in_flight.try_acquire(Stage::Document).unwrap_err(),
            Stage::Document
        );
        drop(token);
        assert_eq!(in_flight.current(), None);
    }

    #[test]
    fn slot_is_reusable_after_release() {
        let in_flight = InFlight::new();
        drop(in_flight.try_acquire(Stage::Face).unwrap());
        let token = in_flight.try_acquire(Stage::Document).unwrap();
        assert_eq!(in_flight.current(), Some(Stage::Document));
        drop(token);
    }
}
