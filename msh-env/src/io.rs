// This file is part of msh, a POSIX-subset shell implementation.

//! File descriptor newtype.

use std::fmt;

/// A raw file descriptor.
///
/// This is a thin newtype, not an owning handle: closing the underlying
/// descriptor is the caller's responsibility, exactly as with the raw `i32`
/// POSIX uses. Using a newtype instead of a bare `i32` throughout
/// `msh-semantics` keeps `dup2(Fd, Fd)` calls from being accidentally
/// transposed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Fd(pub i32);

impl Fd {
    pub const STDIN: Fd = Fd(0);
    pub const STDOUT: Fd = Fd(1);
    pub const STDERR: Fd = Fd(2);

    /// Sentinel meaning "no inherited descriptor" used by the pipeline and
    /// redirection planner for `in_fd`/`out_fd` parameters.
    pub const NONE: Fd = Fd(-1);

    pub fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Fd> for std::os::unix::io::RawFd {
    fn from(fd: Fd) -> Self {
        fd.0
    }
}
