// This file is part of msh, a POSIX-subset shell implementation.

//! The implementation of [`System`] that actually talks to the kernel.

use super::{ForkResult, OpenMode, Pid, System, WaitStatus};
use crate::io::Fd;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::waitpid;
use nix::unistd;
use std::convert::Infallible;
use std::ffi::CString;

/// `System` backed by real `fork`/`pipe`/`exec`/`waitpid` syscalls.
///
/// `RealSystem` carries no state of its own: the state it exposes (open
/// descriptors, environment variables, the process table) lives in the
/// kernel. Constructing more than one `RealSystem` is harmless since they
/// all just forward to the same process.
#[derive(Debug, Default)]
pub struct RealSystem;

impl System for RealSystem {
    unsafe fn fork(&mut self) -> nix::Result<ForkResult> {
        unistd::fork()
    }

    fn pipe(&mut self) -> nix::Result<(Fd, Fd)> {
        let (read, write) = unistd::pipe()?;
        Ok((Fd(read), Fd(write)))
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<()> {
        unistd::dup2(from.0, to.0)?;
        Ok(())
    }

    fn close(&mut self, fd: Fd) -> nix::Result<()> {
        unistd::close(fd.0)
    }

    fn open(&mut self, path: &CString, mode: OpenMode) -> nix::Result<Fd> {
        let (flags, file_mode) = match mode {
            OpenMode::ReadOnly => (OFlag::O_RDONLY, Mode::empty()),
            OpenMode::WriteTruncate => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::from_bits_truncate(0o666),
            ),
            OpenMode::WriteAppend => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
                Mode::from_bits_truncate(0o666),
            ),
        };
        let fd = fcntl::open(path.as_c_str(), flags, file_mode)?;
        Ok(Fd(fd))
    }

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> nix::Result<usize> {
        unistd::read(fd.0, buf)
    }

    fn write(&mut self, fd: Fd, buf: &[u8]) -> nix::Result<usize> {
        unistd::write(fd.0, buf)
    }

    fn execv(&mut self, path: &CString, argv: &[CString]) -> nix::Result<Infallible> {
        unistd::execv(path.as_c_str(), argv)
    }

    fn execvp(&mut self, file: &CString, argv: &[CString]) -> nix::Result<Infallible> {
        unistd::execvp(file.as_c_str(), argv)
    }

    fn waitpid(&mut self, pid: Pid) -> nix::Result<WaitStatus> {
        use nix::sys::wait::WaitStatus::*;
        match waitpid(pid, None)? {
            Exited(pid, code) => Ok(WaitStatus::Exited(pid, code)),
            Signaled(pid, signal, _core_dumped) => Ok(WaitStatus::Signaled(pid, signal as i32)),
            other => Ok(WaitStatus::Other(other.pid().unwrap_or(pid))),
        }
    }

    fn getpid(&self) -> Pid {
        unistd::getpid()
    }

    fn getenv(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn setenv(&mut self, name: &str, value: &str) {
        // SAFETY: the evaluator is single-threaded (see the concurrency
        // model in SPEC_FULL.md §5), so there is no concurrent reader that
        // could observe a torn environment.
        unsafe { std::env::set_var(name, value) };
    }

    fn exit(&mut self, status: i32) -> ! {
        std::process::exit(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_returns_distinct_readable_writable_ends() {
        let mut system = RealSystem;
        let (read, write) = system.pipe().expect("pipe");
        assert_ne!(read, write);
        system.close(read).unwrap();
        system.close(write).unwrap();
    }

    #[test]
    fn getpid_matches_std() {
        let system = RealSystem;
        assert_eq!(system.getpid().as_raw(), std::process::id() as i32);
    }

    #[test]
    fn setenv_then_getenv_round_trips() {
        let mut system = RealSystem;
        system.setenv("MSH_REAL_SYSTEM_TEST", "value");
        assert_eq!(
            system.getenv("MSH_REAL_SYSTEM_TEST"),
            Some("value".to_string())
        );
    }
}
