/// Programmatic request builder.
pub mod dsl;
/// Channel kinds.
pub mod kind;
/// Normalized request model.
pub mod model;
/// Typed channel payloads.
pub mod payload;
/// Wire model.
pub mod raw;
/// Default timing table.
pub mod timing;
