// This file is part of msh, a POSIX-subset shell implementation.

//! Error values returned from system calls.

use std::fmt;

/// Raw error value returned from an underlying system call.
///
/// This is a thin wrapper around `errno`, the same pattern the wider
/// ecosystem uses to keep OS error values `Copy` and lightweight rather than
/// reaching for `std::io::Error` everywhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Errno(pub i32);

impl Errno {
    /// Wraps a `nix` error, discarding everything but the raw errno value.
    pub fn from_nix(e: nix::Error) -> Errno {
        Errno(e as i32)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", nix::errno::Errno::from_i32(self.0))
    }
}

impl From<nix::Error> for Errno {
    fn from(e: nix::Error) -> Self {
        Errno::from_nix(e)
    }
}

impl std::error::Error for Errno {}
