//! Graceful termination requests.

use std::io;

/// Sends SIGTERM to the given process, requesting graceful shutdown.
/// There is no forced-kill path.
///
/// Failure (no permission, PID already gone) is reported to the caller;
/// it must never take down the control loop.
pub fn terminate(pid: u32) -> io::Result<()> {
    // pid 0 would signal the whole process group of the caller.
    if pid == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "refusing to signal pid 0",
        ));
    }

    let result = unsafe { libc::kill(pid as i32, libc::SIGTERM) };
    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
