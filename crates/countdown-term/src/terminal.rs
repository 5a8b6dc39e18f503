// SPDX-License-Identifier: MIT
//
// Terminal control: size queries, cbreak mode, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control and have no safe
// equivalent in std. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Cbreak mode is what the timer needs from the keyboard: keystrokes are
// delivered one at a time, without echo, without waiting for Enter. Unlike
// full raw mode, output post-processing and signal keys stay on, so Ctrl-C
// still interrupts and "\n" still returns the carriage.
//
// The mode is held by a `CbreakGuard`. Dropping the guard restores the
// saved settings. Two paths never reach the drop:
//
//   - a panic (`panic = "abort"`, or a panic while already unwinding),
//     covered by a panic hook;
//   - SIGINT / SIGTERM / SIGHUP, whose default action ends the process on
//     the spot, covered by the handler from `restore_on_interrupt()`.
//
// Both restore the saved termios from a global backup and show the cursor,
// writing straight to fd 1 so they cannot deadlock on a held stdout lock.

use std::io;
#[cfg(not(unix))]
use std::io::Write;
use std::sync::Once;
#[cfg(unix)]
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::io::RawFd;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Fallback used when the terminal cannot be queried (pipes, tests).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether `fd` refers to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Backup of the termios replaced by the live [`CbreakGuard`], for the
/// panic hook. Behind a [`Mutex`], not `static mut`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(RawFd, libc::termios)>> = Mutex::new(None);

#[cfg(unix)]
fn set_backup(value: Option<(RawFd, libc::termios)>) {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        *guard = value;
    }
}

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: end synchronized output, reset SGR
/// attributes, show the cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h";

/// Panic hook guard: ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in cbreak mode with the cursor hidden leaves the
/// user's shell with no echo and no cursor.
pub(crate) fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            original(info);
        }));
    });
}

/// Exit status after an interrupt: 128 + SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Restore the terminal and exit with [`INTERRUPTED_EXIT_CODE`] on Ctrl-C,
/// SIGTERM or SIGHUP.
///
/// The handler runs on its own thread while the main thread may still be
/// inside the tick loop, so it restores from the global backup instead of
/// waiting for the guards to drop.
///
/// # Errors
///
/// Returns an error if a handler is already installed or the OS refuses
/// to install one.
pub fn restore_on_interrupt() -> io::Result<()> {
    ctrlc::set_handler(|| {
        tracing::debug!("interrupted, restoring terminal");
        restore_terminal();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(io::Error::other)
}

/// Undo cbreak mode and show the cursor without going through the guards.
/// Callable from any thread, any number of times.
pub fn restore_terminal() {
    emergency_restore();

    #[cfg(unix)]
    restore_termios_from_backup();
}

/// Write [`EMERGENCY_RESTORE`] directly to stdout's file descriptor,
/// bypassing Rust's `io::stdout()` lock. Skipped when stdout is redirected.
fn emergency_restore() {
    #[cfg(unix)]
    if is_tty(libc::STDOUT_FILENO) {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Cbreak Mode ────────────────────────────────────────────────────────────

/// Scoped cbreak mode on a terminal file descriptor.
///
/// [`acquire`](Self::acquire) saves the current termios and switches the
/// terminal to character-at-a-time input without echo. The saved settings
/// are written back when the guard goes out of scope, including during a
/// panic unwind.
///
/// ```no_run
/// use countdown_term::terminal::CbreakGuard;
///
/// let guard = CbreakGuard::acquire(libc::STDIN_FILENO)?;
/// // ... read single keystrokes ...
/// drop(guard); // Terminal restored.
/// # Ok::<(), std::io::Error>(())
/// ```
#[cfg(unix)]
pub struct CbreakGuard {
    fd: RawFd,
    original: libc::termios,
}

#[cfg(unix)]
impl CbreakGuard {
    /// Enter cbreak mode on `fd`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if `fd` is not a terminal or its settings
    /// cannot be read or changed. Nothing is modified on error.
    pub fn acquire(fd: RawFd) -> io::Result<Self> {
        install_panic_hook();

        let original = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            termios
        };

        let mut cbreak = original;
        cbreak.c_lflag &= !(libc::ICANON | libc::ECHO);
        // VMIN=1, VTIME=0: a read() returns as soon as one byte exists.
        // Readiness is checked with poll() first, so reads never wait.
        cbreak.c_cc[libc::VMIN] = 1;
        cbreak.c_cc[libc::VTIME] = 0;

        set_backup(Some((fd, original)));

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const cbreak) } != 0 {
            let err = io::Error::last_os_error();
            set_backup(None);
            return Err(err);
        }

        tracing::debug!(fd, "entered cbreak mode");
        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for CbreakGuard {
    fn drop(&mut self) {
        // TCSADRAIN: let pending output (the last frame) reach the
        // terminal before the mode changes back.
        if unsafe { libc::tcsetattr(self.fd, libc::TCSADRAIN, &raw const self.original) } != 0 {
            tracing::warn!(
                fd = self.fd,
                error = %io::Error::last_os_error(),
                "failed to restore terminal mode"
            );
        } else {
            tracing::debug!(fd = self.fd, "restored terminal mode");
        }
        set_backup(None);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::PoisonError;

    /// Serializes the tests that touch `TERMIOS_BACKUP`.
    #[cfg(unix)]
    static BACKUP_LOCK: Mutex<()> = Mutex::new(());

    #[cfg(unix)]
    fn pipe() -> (RawFd, RawFd) {
        let mut fds = [0 as RawFd; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        (fds[0], fds[1])
    }

    #[cfg(unix)]
    fn close(fd: RawFd) {
        unsafe {
            libc::close(fd);
        }
    }

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn fallback_size_is_classic_vt100() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn get_size_is_positive_when_known() {
        if let Some(size) = get_size() {
            assert!(size.cols > 0);
            assert!(size.rows > 0);
        }
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_is_valid_utf8() {
        std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
    }

    #[test]
    fn emergency_restore_shows_cursor_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[?2026l"), "must end sync output");
        assert!(s.contains("\x1b[0m"), "must reset SGR attributes");
        assert!(s.ends_with("\x1b[?25h"));
    }

    #[test]
    fn panic_hook_install_is_idempotent() {
        install_panic_hook();
        install_panic_hook();
    }

    // ── Cbreak mode ─────────────────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn pipe_is_not_a_tty() {
        let (r, w) = pipe();
        assert!(!is_tty(r));
        close(r);
        close(w);
    }

    #[cfg(unix)]
    #[test]
    fn acquire_on_non_tty_fails_loudly() {
        let (r, w) = pipe();
        let result = CbreakGuard::acquire(r);
        assert!(result.is_err());
        close(r);
        close(w);
    }

    #[cfg(unix)]
    #[test]
    fn acquire_and_drop_on_real_tty() {
        // Only meaningful when the test runner has a terminal.
        if !is_tty(libc::STDIN_FILENO) {
            return;
        }
        let _serial = BACKUP_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = CbreakGuard::acquire(libc::STDIN_FILENO).unwrap();
        assert_eq!(guard.fd, libc::STDIN_FILENO);
        drop(guard);
        assert!(TERMIOS_BACKUP.lock().unwrap().is_none());
    }

    // ── Restore without the guard ───────────────────────────────────

    /// A fresh pseudo-terminal pair: (master, slave).
    #[cfg(target_os = "linux")]
    fn open_pty() -> (RawFd, RawFd) {
        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "posix_openpt failed");
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);

            let mut name = [0 as libc::c_char; 128];
            assert_eq!(libc::ptsname_r(master, name.as_mut_ptr(), name.len()), 0);
            let slave = libc::open(name.as_ptr(), libc::O_RDWR | libc::O_NOCTTY);
            assert!(slave >= 0, "opening the pty slave failed");
            (master, slave)
        }
    }

    #[cfg(target_os = "linux")]
    fn line_mode(fd: RawFd) -> libc::tcflag_t {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        assert_eq!(unsafe { libc::tcgetattr(fd, &raw mut termios) }, 0);
        termios.c_lflag & (libc::ICANON | libc::ECHO)
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn backup_restores_mode_while_guard_is_alive() {
        let _serial = BACKUP_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let (master, slave) = open_pty();
        let cooked = line_mode(slave);
        assert_eq!(cooked, libc::ICANON | libc::ECHO);

        let guard = CbreakGuard::acquire(slave).unwrap();
        assert_eq!(line_mode(slave), 0);

        // The interrupt handler's path: the guard is still alive and
        // never gets to drop.
        restore_termios_from_backup();
        assert_eq!(line_mode(slave), cooked);

        drop(guard);
        assert_eq!(line_mode(slave), cooked);
        assert!(TERMIOS_BACKUP.lock().unwrap().is_none());
        close(slave);
        close(master);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn restore_without_backup_is_a_no_op() {
        let _serial = BACKUP_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let (master, slave) = open_pty();
        let cooked = line_mode(slave);
        restore_termios_from_backup();
        assert_eq!(line_mode(slave), cooked);
        close(slave);
        close(master);
    }

    #[test]
    fn interrupt_exit_code_is_128_plus_sigint() {
        assert_eq!(INTERRUPTED_EXIT_CODE, 128 + 2);
    }
}
