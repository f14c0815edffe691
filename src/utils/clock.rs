use chrono::{DateTime, Duration, Utc};

///
/// The service's source of time. Normally the system clock, but it can be frozen at an instant and
/// moved forward by hand so reset token expiry can be tested.
///
#[derive(Debug, Default)]
pub struct Clock {
    frozen_at: Option<DateTime<Utc>>,
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    pub fn freeze(&mut self, at: DateTime<Utc>) {
        self.frozen_at = Some(at);
    }

    pub fn thaw(&mut self) {
        self.frozen_at = None;
    }

    ///
    /// Move time forward. A running clock is frozen at the advanced instant.
    ///
    pub fn advance(&mut self, by: Duration) {
        self.frozen_at = Some(self.now() + by);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_clock_stands_still_until_advanced() {
        let start: DateTime<Utc> = DateTime::parse_from_rfc3339("2021-08-23T09:30:00Z").unwrap().into();
        let mut clock = Clock::default();
        assert!(!clock.is_frozen());

        clock.freeze(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));

        clock.thaw();
        assert!(!clock.is_frozen());
        assert!(clock.now() > start);
    }

    #[test]
    fn test_advancing_a_running_clock_freezes_it() {
        let mut clock = Clock::default();
        let before = Utc::now();
        clock.advance(Duration::hours(1));

        assert!(clock.is_frozen());
        assert!(clock.now() >= before + Duration::hours(1));
    }
}
