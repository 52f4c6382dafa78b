/// timestep.rs
/// Fixed tick constants
///
/// One external frame callback = one `Session::tick()` of `TICK_MS`.
/// Physics integrates in seconds; timers and cooldowns count milliseconds.

/// Nominal tick length (ms)
pub const TICK_MS: u64 = 16;

/// Nominal tick length (s)
pub const TICK_DT: f32 = TICK_MS as f32 / 1000.0;

/// Upper bound for any integration step (s); frame hitches never exceed this.
pub const MAX_DT: f32 = 1.0 / 30.0;

/// Physics step multiplier while a save slow-motion window is active.
pub const SLOW_MO_FACTOR: f32 = 0.5;

// Compile-time validation
const _: () = assert!(TICK_DT < MAX_DT);

/// Clamp a raw frame delta into the stable integration range.
#[inline]
pub fn stable_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_DT)
    } else {
        0.0
    }
}
