// This file is part of msh, a POSIX-subset shell implementation.

//! `echo` built-in.
//!
//! # Synopsis
//!
//! ```sh
//! echo [args...]
//! ```
//!
//! # Description
//!
//! Writes `args`, separated by single spaces and terminated by a newline, to
//! the standard output. There is no option parsing: `-n` and `-e` are
//! ordinary arguments, not flags, matching the contract in SPEC_FULL.md §6.
//!
//! # Exit status
//!
//! Always zero, even if the write fails (the write error, if any, is
//! swallowed — there is no well-defined "exit status for a broken pipe" in
//! this scope and the spec does not ask for one).

use msh_env::io::Fd;
use msh_env::Env;

use crate::Builtin;

pub struct Echo;

impl Builtin for Echo {
    fn run(&self, env: &mut Env, argv: &[String]) -> i32 {
        let mut line = argv[1..].join(" ");
        line.push('\n');
        let _ = env.system.write(Fd::STDOUT, line.as_bytes());
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_arguments_with_single_spaces() {
        let argv = vec!["echo".to_string(), "a".to_string(), "b".to_string(), "c".to_string()];
        let mut line = argv[1..].join(" ");
        line.push('\n');
        assert_eq!(line, "a b c\n");
    }

    #[test]
    fn empty_arguments_do_not_add_leading_spaces() {
        let argv = vec!["echo".to_string(), "".to_string(), "x".to_string()];
        let mut line = argv[1..].join(" ");
        line.push('\n');
        assert_eq!(line, " x\n");
    }

    #[test]
    fn no_arguments_is_just_a_newline() {
        let argv = vec!["echo".to_string()];
        let mut line = argv[1..].join(" ");
        line.push('\n');
        assert_eq!(line, "\n");
    }
}
