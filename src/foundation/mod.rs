/// Generational arena.
pub mod arena;
/// Error taxonomy.
pub mod error;
/// Non-fatal scheduling diagnostics.
pub mod issue;
/// Simulation clock and time helpers.
pub mod time;
