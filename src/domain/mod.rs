//! Domain layer containing decision logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, errors, state machine trait)
//! - `decision` - Options, dimensions, user context, session phase and the audit snapshot
//! - `analysis` - Pure scoring and confidence calculations
//! - `stream` - Typed stream events and the codec producing them

pub mod analysis;
pub mod decision;
pub mod foundation;
pub mod stream;
