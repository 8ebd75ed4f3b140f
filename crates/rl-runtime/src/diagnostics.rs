//! SIGQUIT diagnostics dump (spec §5 host-interrupt model; ambient
//! engineering surface).
//!
//! Grounded directly on the teacher's `runtime::diagnostics` module: a
//! `Once`-guarded SIGQUIT handler that prints process state to stderr
//! without stopping the process, reworked from strand/channel counters to
//! frame-arena/call-stack counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static SIGNAL_HANDLER_INIT: Once = Once::new();
static FRAME_COUNT: AtomicUsize = AtomicUsize::new(0);
static CAPTURED_COUNT: AtomicUsize = AtomicUsize::new(0);
static CALL_DEPTH: AtomicUsize = AtomicUsize::new(0);

/// Called by `Evaluator` after each top-level expression so the signal
/// handler always reports a reasonably fresh snapshot without needing a
/// reference to the evaluator itself (a signal handler cannot safely hold
/// one).
pub fn record_snapshot(frame_count: usize, captured_count: usize, call_depth: usize) {
    FRAME_COUNT.store(frame_count, Ordering::Relaxed);
    CAPTURED_COUNT.store(captured_count, Ordering::Relaxed);
    CALL_DEPTH.store(call_depth, Ordering::Relaxed);
}

pub fn install_signal_handler() {
    SIGNAL_HANDLER_INIT.call_once(|| {
        #[cfg(unix)]
        {
            unsafe {
                let _ = signal_hook::low_level::register(signal_hook::consts::SIGQUIT, dump_diagnostics);
            }
        }
    });
}

pub fn dump_diagnostics() {
    use std::io::Write;

    let mut out = std::io::stderr().lock();
    let _ = writeln!(out, "\n=== rlang Runtime Diagnostics ===");
    let _ = writeln!(out, "[Frames]");
    let _ = writeln!(out, "  Allocated: {}", FRAME_COUNT.load(Ordering::Relaxed));
    let _ = writeln!(out, "  Captured: {}", CAPTURED_COUNT.load(Ordering::Relaxed));
    let _ = writeln!(out, "[Call stack]");
    let _ = writeln!(out, "  Depth: {}", CALL_DEPTH.load(Ordering::Relaxed));
    let _ = writeln!(out, "=== End Diagnostics ===\n");
}
