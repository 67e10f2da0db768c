//! # Alert Evaluation
//!
//! Pure functions deriving the low-stock and expiring-soon sets from a
//! stock snapshot.
//!
//! Alerts carry no persisted state: they are recomputed from scratch on
//! every snapshot the live feed delivers and are never cached across
//! snapshot versions. A medicine leaves the alert set the moment a fresh
//! snapshot says so.

use chrono::NaiveDate;

use crate::types::{MedicineRecord, StockSnapshot};
use crate::{EXPIRY_WINDOW_DAYS, LOW_STOCK_THRESHOLD};

/// Medicines with quantity at or below [`LOW_STOCK_THRESHOLD`].
///
/// Includes quantity 0: out-of-stock is the most urgent low-stock case.
pub fn low_stock(snapshot: &StockSnapshot) -> Vec<&MedicineRecord> {
    snapshot
        .medicines()
        .iter()
        .filter(|m| m.quantity <= LOW_STOCK_THRESHOLD)
        .collect()
}

/// Medicines whose expiry date is within [`EXPIRY_WINDOW_DAYS`] of `today`.
///
/// The distance is the absolute calendar-day difference, so an expiry date
/// in the past counts as well: an already-expired medicine stays in the
/// expiring-soon set rather than being flagged separately. Medicines
/// without an expiry date are never included.
pub fn expiring_soon(snapshot: &StockSnapshot, today: NaiveDate) -> Vec<&MedicineRecord> {
    snapshot
        .medicines()
        .iter()
        .filter(|m| match m.expiry_date {
            Some(expiry) => (expiry - today).num_days().abs() <= EXPIRY_WINDOW_DAYS,
            None => false,
        })
        .collect()
}

/// Both alert sets, derived together from one snapshot.
#[derive(Debug)]
pub struct StockAlerts<'a> {
    pub low_stock: Vec<&'a MedicineRecord>,
    pub expiring_soon: Vec<&'a MedicineRecord>,
}

impl<'a> StockAlerts<'a> {
    /// Evaluates both alert sets against a snapshot.
    pub fn evaluate(snapshot: &'a StockSnapshot, today: NaiveDate) -> Self {
        StockAlerts {
            low_stock: low_stock(snapshot),
            expiring_soon: expiring_soon(snapshot, today),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low_stock.is_empty() && self.expiring_soon.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn medicine(
        id: &str,
        name: &str,
        quantity: i64,
        expiry_date: Option<NaiveDate>,
    ) -> MedicineRecord {
        MedicineRecord {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            price_cents: 100,
            expiry_date,
            last_updated: Utc::now(),
            updated_by: "test".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    #[test]
    fn test_low_stock_is_exactly_threshold_set() {
        let snap = StockSnapshot::new(vec![
            medicine("a", "Out of stock", 0, None),
            medicine("b", "At threshold", 10, None),
            medicine("c", "Just above", 11, None),
            medicine("d", "Plenty", 500, None),
        ]);

        let low: Vec<&str> = low_stock(&snap).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(low, vec!["a", "b"]);
    }

    #[test]
    fn test_expiring_soon_window() {
        let t = today();
        let snap = StockSnapshot::new(vec![
            medicine("today", "Expires today", 50, Some(t)),
            medicine("edge", "Expires in 60d", 50, Some(t + Duration::days(60))),
            medicine("far", "Expires in 61d", 50, Some(t + Duration::days(61))),
            medicine("none", "No expiry", 50, None),
        ]);

        let soon: Vec<&str> = expiring_soon(&snap, t).iter().map(|m| m.id.as_str()).collect();
        // diff = 0 is inside the window; 61 days is outside; no date never alerts.
        assert_eq!(soon, vec!["today", "edge"]);
    }

    #[test]
    fn test_already_expired_counts_as_expiring_soon() {
        // Absolute day distance: a medicine 30 days past expiry is still in
        // the set. No separate "expired" state exists.
        let t = today();
        let snap = StockSnapshot::new(vec![medicine(
            "old",
            "Expired last month",
            5,
            Some(t - Duration::days(30)),
        )]);

        assert_eq!(expiring_soon(&snap, t).len(), 1);
    }

    #[test]
    fn test_long_expired_falls_out_of_window() {
        // 61 days past expiry is outside the absolute-distance window, so
        // long-expired stock drops off the alert entirely.
        let t = today();
        let snap = StockSnapshot::new(vec![medicine(
            "ancient",
            "Expired long ago",
            5,
            Some(t - Duration::days(61)),
        )]);

        assert!(expiring_soon(&snap, t).is_empty());
    }

    #[test]
    fn test_evaluate_recomputes_per_snapshot() {
        let t = today();
        let before = StockSnapshot::new(vec![medicine("a", "Aspirin", 3, None)]);
        let alerts = StockAlerts::evaluate(&before, t);
        assert_eq!(alerts.low_stock.len(), 1);

        // Restock observed through a fresh snapshot clears the alert.
        let after = StockSnapshot::new(vec![medicine("a", "Aspirin", 80, None)]);
        let alerts = StockAlerts::evaluate(&after, t);
        assert!(alerts.is_empty());
    }
}
