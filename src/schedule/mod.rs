/// Per-channel registry of queues and handlers.
pub mod channels;
/// Tick-driven dispatch of due instructions.
pub mod dispatch;
/// Pending request stack and composition resolution.
pub mod pending;
/// Projection of request instructions into channel queues.
pub mod project;
/// Time-ordered per-channel instruction queue.
pub mod queue;
