// This file is part of msh, a POSIX-subset shell implementation.

//! The `System` trait: every syscall the evaluator core needs.
//!
//! `msh-semantics` never calls `nix` directly; it goes through a
//! `&mut dyn System` (in practice, always [`real::RealSystem`] for this
//! scope). Routing every syscall through one trait keeps the fork/pipe/dup2
//! dance in one place and gives the evaluator a single seam if a test double
//! were ever added.

pub mod errno;
pub mod real;

pub use errno::Errno;
pub use nix::unistd::ForkResult;
pub use nix::unistd::Pid;

use crate::io::Fd;
use std::ffi::CString;

/// Outcome of reaping one child with `waitpid`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WaitStatus {
    /// The child called `exit` (or returned from `main`) with this code.
    Exited(Pid, i32),
    /// The child was terminated by this signal.
    Signaled(Pid, i32),
    /// Stopped, continued, or otherwise not a terminal status. The core
    /// never acts on job control, so this is always treated as "try again".
    Other(Pid),
}

/// Open-file policy for a single redirection, already resolved from the
/// tree-sitter operator token (see `msh-semantics::redir`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpenMode {
    ReadOnly,
    WriteTruncate,
    WriteAppend,
}

/// System-call surface the evaluator core depends on.
///
/// Every method maps to exactly one POSIX syscall (or, for `fork`, the
/// minimal unsafe wrapper around it). None of them retry on `EINTR`
/// themselves; callers that need that (none do in this scope, since the
/// core blocks `SIGCHLD` around evaluation) would wrap calls explicitly.
pub trait System {
    /// # Safety
    ///
    /// Forking a multi-threaded process is unsafe in general (only
    /// async-signal-safe code may run in the child before `exec`/`exit`).
    /// This core is single-threaded by design (see the concurrency model),
    /// which is what makes calling this sound.
    unsafe fn fork(&mut self) -> nix::Result<ForkResult>;

    fn pipe(&mut self) -> nix::Result<(Fd, Fd)>;

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<()>;

    fn close(&mut self, fd: Fd) -> nix::Result<()>;

    fn open(&mut self, path: &CString, mode: OpenMode) -> nix::Result<Fd>;

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> nix::Result<usize>;

    fn write(&mut self, fd: Fd, buf: &[u8]) -> nix::Result<usize>;

    /// Replaces the calling process image. Only returns on failure (`execv`
    /// never returns on success).
    fn execv(&mut self, path: &CString, argv: &[CString]) -> nix::Result<std::convert::Infallible>;

    /// Like [`System::execv`] but searches `PATH` the way `execvp` does.
    fn execvp(&mut self, file: &CString, argv: &[CString]) -> nix::Result<std::convert::Infallible>;

    fn waitpid(&mut self, pid: Pid) -> nix::Result<WaitStatus>;

    fn getpid(&self) -> Pid;

    fn getenv(&self, name: &str) -> Option<String>;

    fn setenv(&mut self, name: &str, value: &str);

    /// Exits the current process immediately, without running destructors.
    /// Used only in a forked child after a fatal launch error (e.g. exec
    /// failure), matching the spec's "children always `exit`, never
    /// `return`" policy.
    fn exit(&mut self, status: i32) -> !;
}
