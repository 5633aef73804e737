/// Eyelid renderer with autonomous blinking.
pub mod blink;
