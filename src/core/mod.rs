//! Pure calculators. No I/O, no clock, no shared state — everything these
//! functions need comes in as arguments, which is what keeps them trivially
//! testable and safe to call from anywhere.

pub mod achievements;
pub mod progress;
pub mod streaks;

pub use progress::compute_progress;
pub use streaks::compute_streaks;
