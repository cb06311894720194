use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
};

/// Exit status for a second Ctrl-C (128 + SIGINT).
const FORCED_EXIT_CODE: i32 = 130;

static INTERRUPT_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Flag raised by the first Ctrl-C, suitable for [`crate::SolverConfig::with_cancel`].
///
/// The handler is installed on first call. The first interrupt only raises the
/// flag so the solver can finish its current sweep and return the best route;
/// a second interrupt exits immediately.
pub fn interrupt_flag() -> Arc<AtomicBool> {
    INTERRUPT_FLAG
        .get_or_init(|| {
            let flag = Arc::new(AtomicBool::new(false));
            let handler_flag = Arc::clone(&flag);
            if let Err(err) = ctrlc::set_handler(move || {
                if handler_flag.swap(true, Ordering::SeqCst) {
                    std::process::exit(FORCED_EXIT_CODE);
                }
                log::warn!("interrupt: stopping after the current sweep, press Ctrl-C again to abort");
            }) {
                log::warn!("interrupt: failed to install handler err={err}");
            }
            flag
        })
        .clone()
}
