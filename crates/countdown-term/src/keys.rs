// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Non-blocking single-keystroke input.
//
// The timer loop asks "is a key waiting?" once per tick and must never be
// stalled by the answer. `KeySource` is that question. There are two real
// answers, picked once by `open_stdin()` for the platform the binary was
// built for:
//
//   PosixKeys:   cbreak mode on stdin (via `CbreakGuard`), then a
//                zero-timeout `poll()` before every one-byte `read()`.
//                The read only happens when poll says data is there, so
//                it cannot block.
//
//   ConsoleKeys: the Windows CRT's `_kbhit()` / `_getwch()`. The console
//                already delivers keys unbuffered and unechoed to
//                `_getwch()`, so there is no mode to acquire.
//
// Read errors are not surfaced. A failed read is "no key this tick", and
// the next tick asks again.

use std::io;

#[cfg(unix)]
use std::os::unix::io::RawFd;

#[cfg(unix)]
use crate::terminal::{CbreakGuard, is_tty};

// ─── KeySource ──────────────────────────────────────────────────────────────

/// A source of single keystrokes that never blocks.
pub trait KeySource {
    /// The next pending keystroke, or `None` if nothing is waiting.
    ///
    /// Must return immediately either way.
    fn poll_key(&mut self) -> Option<char>;
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    fn poll_key(&mut self) -> Option<char> {
        (**self).poll_key()
    }
}

/// Open the keyboard for this platform.
///
/// On unix, stdin is switched to cbreak mode when it is a terminal; the
/// mode is restored when the returned source is dropped.
///
/// # Errors
///
/// Returns an error if stdin is a terminal but its mode cannot be changed.
#[cfg(unix)]
pub fn open_stdin() -> io::Result<Box<dyn KeySource>> {
    Ok(Box::new(PosixKeys::stdin()?))
}

/// Open the keyboard for this platform.
///
/// # Errors
///
/// Infallible on Windows; returns `Result` to match the unix signature.
#[cfg(windows)]
pub fn open_stdin() -> io::Result<Box<dyn KeySource>> {
    Ok(Box::new(ConsoleKeys::new()))
}

/// Open the keyboard for this platform.
///
/// # Errors
///
/// Always fails: no non-blocking key reader exists for this target.
#[cfg(not(any(unix, windows)))]
pub fn open_stdin() -> io::Result<Box<dyn KeySource>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no non-blocking keyboard support on this platform",
    ))
}

// ─── POSIX ──────────────────────────────────────────────────────────────────

/// Keystrokes from a file descriptor, checked with `poll()` before reading.
///
/// Does not own the descriptor: dropping a `PosixKeys` restores the
/// terminal mode but never closes `fd`.
#[cfg(unix)]
pub struct PosixKeys {
    fd: RawFd,
    mode: Option<CbreakGuard>,
}

#[cfg(unix)]
impl PosixKeys {
    /// Keystrokes from stdin.
    ///
    /// # Errors
    ///
    /// See [`from_fd`](Self::from_fd).
    pub fn stdin() -> io::Result<Self> {
        Self::from_fd(libc::STDIN_FILENO)
    }

    /// Keystrokes from `fd`, entering cbreak mode if it is a terminal.
    ///
    /// Pipes and files are read as-is: they have no line discipline, so
    /// there is nothing to switch off.
    ///
    /// # Errors
    ///
    /// Returns an error if `fd` is a terminal and cbreak mode cannot be
    /// entered. There is no fallback to a line-buffered reader.
    pub fn from_fd(fd: RawFd) -> io::Result<Self> {
        let mode = if is_tty(fd) {
            Some(CbreakGuard::acquire(fd)?)
        } else {
            tracing::debug!(fd, "key input is not a terminal, reading without cbreak");
            None
        };
        Ok(Self { fd, mode })
    }

    /// Zero-timeout readiness check.
    fn ready(&self) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let n = unsafe { libc::poll(&raw mut pfd, 1, 0) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n > 0 && pfd.revents & libc::POLLIN != 0)
    }

    /// Read exactly one byte. `None` at end of input.
    fn read_byte(&self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&raw mut byte).cast(), 1) };
        match n {
            n if n < 0 => Err(io::Error::last_os_error()),
            0 => Ok(None),
            _ => Ok(Some(byte)),
        }
    }

    /// Read one UTF-8 encoded character, pulling continuation bytes only
    /// while they are already available.
    fn read_char(&self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let len = utf8_len(lead);
        if len <= 1 {
            return Ok((len == 1).then_some(char::from(lead)));
        }

        let mut bytes = [lead, 0, 0, 0];
        for slot in &mut bytes[1..len] {
            if !self.ready()? {
                return Ok(None);
            }
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Ok(None),
            }
        }

        Ok(std::str::from_utf8(&bytes[..len])
            .ok()
            .and_then(|s| s.chars().next()))
    }
}

#[cfg(unix)]
impl KeySource for PosixKeys {
    fn poll_key(&mut self) -> Option<char> {
        let result = self
            .ready()
            .and_then(|ready| if ready { self.read_char() } else { Ok(None) });

        match result {
            Ok(key) => key,
            Err(err) => {
                tracing::trace!(%err, "key read failed, treating as no key");
                None
            }
        }
    }
}

/// Encoded length of a UTF-8 sequence from its lead byte; 0 if `lead`
/// cannot start a sequence.
#[cfg_attr(not(unix), allow(dead_code))]
const fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

// ─── Windows console ────────────────────────────────────────────────────────

#[cfg(windows)]
unsafe extern "C" {
    fn _kbhit() -> i32;
    fn _getwch() -> u16;
}

/// Keystrokes from the Windows console via the CRT.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct ConsoleKeys;

#[cfg(windows)]
impl ConsoleKeys {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl KeySource for ConsoleKeys {
    fn poll_key(&mut self) -> Option<char> {
        if unsafe { _kbhit() } == 0 {
            return None;
        }
        let unit = unsafe { _getwch() };
        // Arrow and function keys arrive as a 0x00/0xE0 prefix plus a scan
        // code. Swallow the scan code; the timer has no use for them.
        if unit == 0x00 || unit == 0xE0 {
            let _ = unsafe { _getwch() };
            return None;
        }
        // A key outside the BMP arrives as two surrogate units, each of
        // which fails here and is dropped. No command key is affected.
        char::from_u32(u32::from(unit))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<char>);

    impl KeySource for Scripted {
        fn poll_key(&mut self) -> Option<char> {
            self.0.pop_front()
        }
    }

    #[test]
    fn boxed_source_forwards() {
        let mut keys: Box<dyn KeySource> = Box::new(Scripted(VecDeque::from(['p', 'q'])));
        assert_eq!(keys.poll_key(), Some('p'));
        assert_eq!(keys.poll_key(), Some('q'));
        assert_eq!(keys.poll_key(), None);
    }

    #[test]
    fn utf8_len_from_lead_byte() {
        assert_eq!(utf8_len(b'q'), 1);
        assert_eq!(utf8_len(0xC3), 2);
        assert_eq!(utf8_len(0xE2), 3);
        assert_eq!(utf8_len(0xF0), 4);
        assert_eq!(utf8_len(0x80), 0, "continuation byte cannot lead");
        assert_eq!(utf8_len(0xFF), 0);
    }

    #[cfg(unix)]
    mod posix {
        use super::super::*;
        use std::time::{Duration, Instant};

        struct Pipe {
            read: RawFd,
            write: Option<RawFd>,
        }

        impl Pipe {
            fn new() -> Self {
                let mut fds = [0 as RawFd; 2];
                assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
                Self {
                    read: fds[0],
                    write: Some(fds[1]),
                }
            }

            fn send(&self, bytes: &[u8]) {
                let fd = self.write.unwrap();
                let n = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
                assert_eq!(usize::try_from(n).unwrap(), bytes.len());
            }

            fn close_writer(&mut self) {
                if let Some(fd) = self.write.take() {
                    unsafe { libc::close(fd) };
                }
            }
        }

        impl Drop for Pipe {
            fn drop(&mut self) {
                self.close_writer();
                unsafe { libc::close(self.read) };
            }
        }

        #[test]
        fn pipe_input_skips_cbreak() {
            let pipe = Pipe::new();
            let keys = PosixKeys::from_fd(pipe.read).unwrap();
            assert!(keys.mode.is_none());
        }

        #[test]
        fn empty_input_returns_immediately() {
            let pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            let start = Instant::now();
            for _ in 0..100 {
                assert_eq!(keys.poll_key(), None);
            }
            assert!(start.elapsed() < Duration::from_millis(500));
        }

        #[test]
        fn pending_key_is_returned_once() {
            let pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            pipe.send(b"q");
            assert_eq!(keys.poll_key(), Some('q'));
            assert_eq!(keys.poll_key(), None);
        }

        #[test]
        fn keys_are_delivered_one_per_poll() {
            let pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            pipe.send(b"p s");
            assert_eq!(keys.poll_key(), Some('p'));
            assert_eq!(keys.poll_key(), Some(' '));
            assert_eq!(keys.poll_key(), Some('s'));
            assert_eq!(keys.poll_key(), None);
        }

        #[test]
        fn multibyte_key_decodes_to_one_char() {
            let pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            pipe.send("é€".as_bytes());
            assert_eq!(keys.poll_key(), Some('é'));
            assert_eq!(keys.poll_key(), Some('€'));
        }

        #[test]
        fn invalid_lead_byte_is_no_key() {
            let pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            pipe.send(&[0xFF, b'q']);
            assert_eq!(keys.poll_key(), None);
            assert_eq!(keys.poll_key(), Some('q'));
        }

        #[test]
        fn closed_input_is_no_key() {
            let mut pipe = Pipe::new();
            let mut keys = PosixKeys::from_fd(pipe.read).unwrap();

            pipe.close_writer();
            assert_eq!(keys.poll_key(), None);
            assert_eq!(keys.poll_key(), None);
        }
    }
}
