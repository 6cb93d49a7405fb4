//! Safe wrappers for driving the exported `abort` from code that forbids
//! `unsafe`, plus `SIGABRT` handlers that exercise its signal path.

use std::ffi::c_int;
use std::io;

use crate::stdlib_abi;

/// Behaviour of a `SIGABRT` handler installed with [`install_sigabrt_handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigabrtHandler {
    /// Return immediately, as if the program chose to ignore the abort.
    Return,
    /// Call `abort` again from inside the handler.
    Reabort,
}

extern "C" fn returning_handler(_sig: c_int) {}

extern "C" fn reabort_handler(_sig: c_int) {
    // SAFETY: `abort` takes no arguments and never returns.
    unsafe { stdlib_abi::abort() }
}

/// Install `handler` as the process-wide `SIGABRT` disposition.
pub fn install_sigabrt_handler(handler: SigabrtHandler) -> io::Result<()> {
    let entry: extern "C" fn(c_int) = match handler {
        SigabrtHandler::Return => returning_handler,
        SigabrtHandler::Reabort => reabort_handler,
    };

    // SAFETY: the sigaction struct is locally owned and fully initialized
    // before use; `entry` is a valid `extern "C" fn(c_int)` for the whole
    // process lifetime.
    let rc = unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = entry as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGABRT, &action, std::ptr::null_mut())
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Call the exported `abort` entry point.
pub fn call_abort() -> ! {
    // SAFETY: `abort` takes no arguments and never returns.
    unsafe { stdlib_abi::abort() }
}
