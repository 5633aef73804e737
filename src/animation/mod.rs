/// Easing curves.
pub mod ease;
/// Five-phase envelope every channel renderer drives.
pub mod envelope;
/// Interpolatable channel values.
pub mod value;
