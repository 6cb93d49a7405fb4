//! Process termination for the host runtime's `ax_panic`.

use std::ffi::c_long;
use std::sync::atomic::{AtomicBool, Ordering};

use axshim_core::config::{ABORT_EXIT_STATUS, AbortStrategy};

// Set on the first termination attempt. A nested abort (from a SIGABRT
// handler, or std's own abort path re-entering our exported `abort`) goes
// straight to exit_group.
static ABORTING: AtomicBool = AtomicBool::new(false);

pub(crate) fn terminate(strategy: AbortStrategy) -> ! {
    if ABORTING.swap(true, Ordering::SeqCst) {
        exit_group();
    }

    match strategy {
        // SAFETY: only touches this thread's signal mask and SIGABRT disposition.
        AbortStrategy::Signal => unsafe { raise_sigabrt() },
        AbortStrategy::Panic => panic_at_c_boundary(),
        AbortStrategy::Exit => {}
    }

    exit_group()
}

/// Deliver `SIGABRT` the way C `abort` does: unblock it, raise it, and if a
/// handler returns, restore the default disposition and raise again.
unsafe fn raise_sigabrt() {
    // SAFETY: all arguments are locally owned, zero-initialized POD structs.
    unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        libc::sigaddset(&mut set, libc::SIGABRT);
        libc::pthread_sigmask(libc::SIG_UNBLOCK, &set, std::ptr::null_mut());
        libc::raise(libc::SIGABRT);

        let mut dfl: libc::sigaction = std::mem::zeroed();
        dfl.sa_sigaction = libc::SIG_DFL;
        libc::sigaction(libc::SIGABRT, &dfl, std::ptr::null_mut());
        libc::raise(libc::SIGABRT);
    }
}

// A panic cannot unwind out of an `extern "C"` frame; the Rust runtime aborts
// the process once the panic hook has printed the message.
extern "C" fn panic_at_c_boundary() -> ! {
    panic!("abort() called");
}

fn exit_group() -> ! {
    // SAFETY: exit_group takes a plain status and terminates every thread.
    unsafe { libc::syscall(libc::SYS_exit_group as c_long, ABORT_EXIT_STATUS) };
    // SAFETY: `SYS_exit_group` does not return on Linux.
    unsafe { core::hint::unreachable_unchecked() }
}
