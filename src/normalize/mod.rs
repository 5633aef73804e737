/// Instruction normalizer.
pub mod instruction;
/// Request normalizer.
pub mod request;
