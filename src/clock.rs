use chrono::{DateTime, SecondsFormat, Utc};

/// Source of "now" for ids and timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// ISO-8601 timestamp with millisecond precision, e.g.
    /// `2024-03-01T08:15:00.000Z`.
    fn now_iso(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[test]
    fn manual_clock_formats_iso_millis() {
        let clock = ManualClock::at_millis(1_700_000_000_123);
        assert_eq!(clock.now_millis(), 1_700_000_000_123);
        assert_eq!(clock.now_iso(), "2023-11-14T22:13:20.123Z");

        clock.advance_millis(877);
        assert_eq!(clock.now_iso(), "2023-11-14T22:13:21.000Z");
    }

    #[test]
    fn system_clock_agrees_with_its_own_iso_string() {
        let clock = SystemClock;
        let iso = clock.now_iso();
        assert!(iso.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&iso).unwrap();
        assert!((clock.now_millis() - parsed.timestamp_millis()).abs() < 60_000);
    }
}
