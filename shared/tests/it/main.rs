//! Single test binary for the annotation core.
//!
//! - unit: one component at a time
//! - integration: whole-surface scenarios driven through the public operations

mod helpers;
mod unit;
