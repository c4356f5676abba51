use chrono::NaiveDate;

use crate::error::{FlowerError, Result};
use super::milestone::Milestone;
use super::storage::KeyValueStore;

/// Storage key of the persisted start date
pub const START_DATE_KEY: &str = "relationshipDate";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| FlowerError::InvalidDate(trimmed.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `start` to `today`, never negative
pub fn elapsed_days(start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - start).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Owns the persisted relationship start date.
///
/// "Today" is always passed in so the arithmetic stays independent of the
/// host clock.
pub struct DateTracker<S: KeyValueStore> {
    store: S,
    start: Option<NaiveDate>,
}

impl<S: KeyValueStore> DateTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store, start: None }
    }

    /// Read the stored date; a missing or unreadable value counts as today
    pub fn load(&mut self, today: NaiveDate) -> Result<u32> {
        self.start = match self.store.get(START_DATE_KEY)? {
            Some(saved) => match parse_date(&saved) {
                Ok(date) => Some(date),
                Err(err) => {
                    log::warn!("Ignoring stored start date: {}", err);
                    None
                }
            },
            None => None,
        };
        Ok(self.days(today))
    }

    /// Validate and persist a new start date
    pub fn set_date(&mut self, input: &str, today: NaiveDate) -> Result<u32> {
        let date = parse_date(input)?;
        if date > today {
            return Err(FlowerError::FutureDate(date));
        }

        self.store.set(START_DATE_KEY, &format_date(date))?;
        self.start = Some(date);
        log::info!("Start date set to {}", date);
        Ok(self.days(today))
    }

    /// Forget the stored date; counting restarts today
    pub fn reset(&mut self) -> Result<u32> {
        self.store.remove(START_DATE_KEY)?;
        self.start = None;
        Ok(0)
    }

    pub fn is_set(&self) -> bool {
        self.start.is_some()
    }

    /// The stored date, or today when none is set
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        self.start.unwrap_or(today)
    }

    pub fn days(&self, today: NaiveDate) -> u32 {
        elapsed_days(self.start_date(today), today)
    }

    pub fn milestone(&self, today: NaiveDate) -> Option<Milestone> {
        Milestone::for_days(self.days(today))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_date(" 2024-01-05 ").unwrap(), date(2024, 1, 5));
        assert_eq!(format_date(date(2024, 1, 5)), "2024-01-05");
        assert!(matches!(parse_date(""), Err(FlowerError::InvalidDate(_))));
        assert!(matches!(parse_date("2023-02-29"), Err(FlowerError::InvalidDate(_))));
        assert!(matches!(parse_date("05.01.2024"), Err(FlowerError::InvalidDate(_))));
    }

    #[test]
    fn test_elapsed_days() {
        assert_eq!(elapsed_days(date(2024, 1, 1), date(2024, 1, 1)), 0);
        assert_eq!(elapsed_days(date(2024, 1, 1), date(2024, 12, 31)), 365);
        assert_eq!(elapsed_days(date(2023, 3, 1), date(2024, 3, 1)), 366);
        assert_eq!(elapsed_days(date(2024, 6, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_load_without_saved_date() {
        let today = date(2024, 5, 10);
        let mut tracker = DateTracker::new(MemoryStore::new());
        assert_eq!(tracker.load(today).unwrap(), 0);
        assert!(!tracker.is_set());
        assert_eq!(tracker.start_date(today), today);
        assert_eq!(tracker.milestone(today), Some(Milestone::FirstDay));
    }

    #[test]
    fn test_load_saved_date() {
        let mut store = MemoryStore::new();
        store.set(START_DATE_KEY, "2024-05-03").unwrap();
        let mut tracker = DateTracker::new(store);
        assert_eq!(tracker.load(date(2024, 5, 10)).unwrap(), 7);
        assert_eq!(tracker.milestone(date(2024, 5, 10)), Some(Milestone::OneWeek));
    }

    #[test]
    fn test_load_ignores_garbage() {
        let mut store = MemoryStore::new();
        store.set(START_DATE_KEY, "not a date").unwrap();
        let mut tracker = DateTracker::new(store);
        assert_eq!(tracker.load(date(2024, 5, 10)).unwrap(), 0);
        assert!(!tracker.is_set());
    }

    #[test]
    fn test_set_date_persists() {
        let today = date(2024, 5, 10);
        let mut tracker = DateTracker::new(MemoryStore::new());
        assert_eq!(tracker.set_date("2024-01-31", today).unwrap(), 100);
        assert_eq!(
            tracker.store().get(START_DATE_KEY).unwrap().as_deref(),
            Some("2024-01-31")
        );
        assert_eq!(tracker.milestone(today), Some(Milestone::HundredDays));
    }

    #[test]
    fn test_set_date_rejects_bad_input() {
        let today = date(2024, 5, 10);
        let mut tracker = DateTracker::new(MemoryStore::new());
        tracker.set_date("2024-05-01", today).unwrap();

        assert!(matches!(tracker.set_date("", today), Err(FlowerError::InvalidDate(_))));
        assert!(matches!(
            tracker.set_date("2024-05-11", today),
            Err(FlowerError::FutureDate(d)) if d == date(2024, 5, 11)
        ));
        // Rejected input leaves the stored date alone
        assert_eq!(tracker.start_date(today), date(2024, 5, 1));
    }

    #[test]
    fn test_reset() {
        let today = date(2024, 5, 10);
        let mut tracker = DateTracker::new(MemoryStore::new());
        tracker.set_date("2023-05-11", today).unwrap();
        assert_eq!(tracker.days(today), 365);

        assert_eq!(tracker.reset().unwrap(), 0);
        assert_eq!(tracker.days(today), 0);
        assert_eq!(tracker.store().get(START_DATE_KEY).unwrap(), None);
    }
}
