//! Clock builtins.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const TIME_MODULUS: u128 = 1_000_000_000;

/// Milliseconds since the Unix epoch, modulo 10^9.
pub fn time() -> i32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    // The modulus keeps the value below 10^9 < i32::MAX.
    i32::try_from(millis % TIME_MODULUS).unwrap_or(0)
}

/// Busy-wait for `ms` milliseconds without yielding, then return 0.
///
/// Non-positive durations return immediately.
pub fn sleep(ms: i32) -> i32 {
    let Ok(ms) = u64::try_from(ms) else {
        return 0;
    };
    let budget = Duration::from_millis(ms);
    let start = Instant::now();
    while start.elapsed() < budget {
        std::hint::spin_loop();
    }
    0
}
