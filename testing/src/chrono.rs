//! A clock frozen at a settable, per-thread instant.

use chrono::DateTime;
use std::cell::Cell;

thread_local! {
    static TIMESTAMP: Cell<i64> = const { Cell::new(1234567890) };
}

pub struct Utc;

impl Utc {
    pub fn now() -> DateTime<chrono::Utc> {
        TIMESTAMP.with(|timestamp| DateTime::<chrono::Utc>::from_timestamp(
            timestamp.get(),
            0,
        )).expect("need a valid timestamp set")
    }
}

/// Sets the instant, in seconds, seen by the current thread.
pub fn set_timestamp(timestamp: i64) {
    TIMESTAMP.with(|ts| ts.set(timestamp));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frozen() {
        assert_eq!(Utc::now().timestamp(), 1234567890);
        set_timestamp(42);
        assert_eq!(Utc::now().timestamp_millis(), 42000);
    }
}
