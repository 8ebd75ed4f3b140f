//! Core value, error, and series model for the rlang runtime.
//!
//! This crate has no knowledge of frames, evaluation, or parsing — it is
//! pure data: the tagged value union (§3.1), the series protocol shared by
//! string/binary/block/paren (§3.2), words and paths (§3.3/§3.6), and the
//! structured error type every other crate in the workspace propagates
//! (§3.7/§7).

pub mod bitset;
pub mod decimal;
pub mod error;
pub mod mold;
pub mod path;
pub mod series;
pub mod value;
pub mod word;

pub use bitset::Bitset;
pub use decimal::Decimal;
pub use error::{ErrorCategory, RlError};
pub use path::{Path, PathSegment};
pub use value::Value;
pub use word::WordKind;
