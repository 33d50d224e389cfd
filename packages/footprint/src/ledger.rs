//! Per-session transport ledger.

use carbon_tracker_footprint_models::{TransportMode, TransportationRecord};

/// Ordered, append-only list of transport records.
///
/// Insertion order is display order. The only removal is [`Self::reset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordLedger {
    records: Vec<TransportationRecord>,
}

impl RecordLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record if `distance_km` is positive and at most
    /// [`TransportationRecord::MAX_DISTANCE_KM`], `trips` is at least one,
    /// and the combined distance is finite. Returns whether the record was
    /// added; anything else is ignored.
    pub fn add(&mut self, mode: TransportMode, distance_km: f64, trips: u32) -> bool {
        let in_range = distance_km > 0.0 && distance_km <= TransportationRecord::MAX_DISTANCE_KM;
        if !in_range || trips == 0 || !(distance_km * f64::from(trips)).is_finite() {
            log::debug!("Ignoring {mode} record: distance_km={distance_km} trips={trips}");
            return false;
        }

        self.records.push(TransportationRecord {
            mode,
            distance_km,
            trips,
        });
        true
    }

    /// Removes every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[TransportationRecord] {
        &self.records
    }

    /// Records paired with their 1-based display position.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &TransportationRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut ledger = RecordLedger::new();
        assert!(ledger.add(TransportMode::Car, 10.0, 1));
        assert!(ledger.add(TransportMode::LongHaulFlight, 5000.0, 2));

        let modes: Vec<_> = ledger.records().iter().map(|r| r.mode).collect();
        assert_eq!(modes, vec![TransportMode::Car, TransportMode::LongHaulFlight]);
    }

    #[test]
    fn zero_distance_or_trips_is_ignored() {
        let mut ledger = RecordLedger::new();
        ledger.add(TransportMode::Car, 10.0, 1);
        let before = ledger.clone();

        assert!(!ledger.add(TransportMode::Car, 0.0, 3));
        assert!(!ledger.add(TransportMode::Car, 25.0, 0));
        assert_eq!(ledger, before);
    }

    #[test]
    fn negative_or_nan_distance_is_ignored() {
        let mut ledger = RecordLedger::new();
        assert!(!ledger.add(TransportMode::PublicTransport, -4.0, 1));
        assert!(!ledger.add(TransportMode::PublicTransport, f64::NAN, 1));
        assert!(!ledger.add(TransportMode::PublicTransport, f64::INFINITY, 1));
        assert!(ledger.is_empty());
    }

    #[test]
    fn oversized_distance_is_ignored() {
        let mut ledger = RecordLedger::new();
        assert!(!ledger.add(TransportMode::LongHaulFlight, 1e308, 10));
        assert!(!ledger.add(
            TransportMode::LongHaulFlight,
            TransportationRecord::MAX_DISTANCE_KM + 1.0,
            1
        ));
        assert!(ledger.is_empty());

        assert!(ledger.add(
            TransportMode::LongHaulFlight,
            TransportationRecord::MAX_DISTANCE_KM,
            u32::MAX
        ));
        assert!(ledger.records()[0].total_km().is_finite());
    }

    #[test]
    fn reset_empties_ledger() {
        let mut ledger = RecordLedger::new();
        ledger.add(TransportMode::Car, 10.0, 1);
        ledger.add(TransportMode::ShortHaulFlight, 800.0, 2);
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn numbering_starts_at_one() {
        let mut ledger = RecordLedger::new();
        ledger.add(TransportMode::Car, 10.0, 1);
        ledger.add(TransportMode::Car, 20.0, 1);
        let positions: Vec<usize> = ledger.numbered().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1, 2]);
    }
}
