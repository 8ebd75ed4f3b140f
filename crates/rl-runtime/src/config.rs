//! Evaluator configuration (spec §4.3.1, §6).
//!
//! Builder-pattern configuration modeled directly on the teacher's
//! `CompilerConfig`/`ExternalBuiltin` pair: a plain data struct with
//! `with_*` methods that consume and return `self`, rather than a
//! constructor taking a dozen positional arguments.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Trace/debug side-channel toggles (spec §6: "configuration for
/// trace/debug side-channels").
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceOptions {
    pub trace_calls: bool,
    pub trace_words: bool,
}

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub trace: TraceOptions,
    /// Upper bound on nested call depth before the evaluator fails with an
    /// `Internal` category error instead of overflowing the host stack.
    /// `None` means no enforced limit.
    pub max_call_depth: Option<usize>,
    /// Shared flag a host signal handler can set to request cancellation at
    /// the next suspension point (spec §5).
    pub cancel_flag: Arc<AtomicBool>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            trace: TraceOptions::default(),
            max_call_depth: Some(4096),
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        EvaluatorConfig::default()
    }

    pub fn with_trace_calls(mut self, on: bool) -> Self {
        self.trace.trace_calls = on;
        self
    }

    pub fn with_trace_words(mut self, on: bool) -> Self {
        self.trace.trace_words = on;
        self
    }

    pub fn with_max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = flag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chains_without_mutating_defaults_elsewhere() {
        let config = EvaluatorConfig::new().with_trace_calls(true).with_max_call_depth(Some(10));
        assert!(config.trace.trace_calls);
        assert!(!config.trace.trace_words);
        assert_eq!(config.max_call_depth, Some(10));
    }

    #[test]
    fn shared_cancel_flag_is_observed_through_clone() {
        let flag = Arc::new(AtomicBool::new(false));
        let config = EvaluatorConfig::new().with_cancel_flag(flag.clone());
        flag.store(true, std::sync::atomic::Ordering::Relaxed);
        assert!(config.cancel_flag.load(std::sync::atomic::Ordering::Relaxed));
    }
}
