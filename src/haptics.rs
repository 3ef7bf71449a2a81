//! Best-effort haptic feedback
//!
//! A single short pulse on tap. Browsers without vibration support (and
//! native builds) silently do nothing.

/// Pulse duration for a bubble tap (milliseconds)
pub const TAP_PULSE_MS: u32 = 20;

#[cfg(target_arch = "wasm32")]
pub fn pulse(duration_ms: u32) {
    if let Some(window) = web_sys::window() {
        // Returns false when the UA refuses; nothing to do either way
        let _ = window.navigator().vibrate_with_duration(duration_ms);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pulse(_duration_ms: u32) {}
