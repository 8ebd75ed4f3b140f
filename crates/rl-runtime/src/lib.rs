//! Frame store, evaluator, PARSE engine, and native protocol for rlang
//! (spec §4.2–§4.5).
//!
//! `rl-core` supplies the value model; this crate supplies everything that
//! needs a notion of "right now, in this call" — binding frames, the
//! tree-walking evaluator, PARSE, and the native-function registry. An
//! embedding host builds an `Evaluator`, calls `natives::register_all` (or
//! registers its own subset via `Evaluator::register_native`), and feeds it
//! values produced by `rl-reader`.

pub mod config;
pub mod evaluator;
pub mod frame;
pub mod function;
pub mod native;
pub mod natives;
pub mod parse_engine;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

pub use config::EvaluatorConfig;
pub use evaluator::{ActivationRecord, Evaluator};
pub use frame::{Frame, FrameHandle, FrameKind, FrameStore};
