use chrono::{Datelike, Local};

/// Supplies the calendar year the year buckets are resolved against
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Reads the year from the local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Always reports the same year
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
