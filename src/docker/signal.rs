#[cfg(unix)]
use std::sync::OnceLock;

use super::types::InterruptFlag;

#[cfg(unix)]
static INSTALLED: OnceLock<InterruptFlag> = OnceLock::new();

/// Route SIGINT and SIGTERM into `flag` instead of terminating the process.
///
/// The running child shares our process group and still receives the
/// signal, so the current command fails normally and the cleanup path runs.
/// Returns `false` if a handler was already installed or the platform has
/// no support.
pub fn install_interrupt_handler(flag: &InterruptFlag) -> bool {
    #[cfg(unix)]
    {
        if INSTALLED.set(flag.clone()).is_err() {
            return false;
        }
        let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: `on_signal` only performs an atomic load and store, which is
        // async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, handler);
            libc::signal(libc::SIGTERM, handler);
        }
        true
    }

    #[cfg(not(unix))]
    {
        let _ = flag;
        false
    }
}

#[cfg(unix)]
extern "C" fn on_signal(_signum: libc::c_int) {
    if let Some(flag) = INSTALLED.get() {
        flag.raise();
    }
}
