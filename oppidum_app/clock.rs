use chrono::{DateTime, Utc};

/// Source of the current time for handlers. Domain models never read the
/// wall clock themselves; they take timestamps from here so that catch-up
/// and scheduling stay reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
