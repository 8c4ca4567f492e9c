// This file is part of msh, a POSIX-subset shell implementation.

//! Command substitution: `$(...)` (SPEC_FULL.md §4.2.3).
//!
//! The inner command runs in a forked child with its standard output
//! connected to a pipe; the parent reads the pipe to completion, waits for
//! the child, and trims the trailing newlines the shell convention strips
//! from every substitution's result.

use std::ffi::CString;

use msh_env::io::Fd;
use msh_env::system::ForkResult;
use msh_env::Env;
use msh_syntax::Node;

use super::ExpansionError;

/// The interpreter used to run a substituted command's inner text.
///
/// A full shell would re-enter its own parser here; this core instead hands
/// the text to a real `/bin/sh`, which is sufficient for the substitutions
/// this scope needs to support and keeps the forked child's job to a single
/// `execv` (mirrors the reference implementation's `capture_command_subst`).
const SUBSHELL: &str = "/bin/sh";

pub fn expand(node: Node<'_>, env: &mut Env) -> (String, Option<ExpansionError>) {
    let inner = inner_command_text(node.byte_slice());
    match run_and_capture(inner, env) {
        Ok(output) => (trim_trailing_newlines(output), None),
        Err(_) => (String::new(), Some(ExpansionError::SubstitutionFailed)),
    }
}

/// Strips the `$(` prefix and matching `)` suffix from a `command_substitution`
/// node's raw text.
fn inner_command_text(text: &str) -> &str {
    text.strip_prefix("$(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text)
}

fn trim_trailing_newlines(mut output: String) -> String {
    while output.ends_with('\n') {
        output.pop();
    }
    output
}

fn run_and_capture(command: &str, env: &mut Env) -> nix::Result<String> {
    let (read_end, write_end) = env.system.pipe()?;

    // SAFETY: the evaluator is single-threaded, satisfying System::fork's
    // safety contract.
    match unsafe { env.system.fork()? } {
        ForkResult::Child => {
            let _ = env.system.close(read_end);
            let _ = env.system.dup2(write_end, Fd::STDOUT);
            let _ = env.system.close(write_end);

            let program = CString::new(SUBSHELL).unwrap_or_default();
            let argv = [
                CString::new(SUBSHELL).unwrap_or_default(),
                CString::new("-c").unwrap_or_default(),
                CString::new(command).unwrap_or_default(),
            ];
            let _ = env.system.execv(&program, &argv);
            env.system.exit(127);
        }
        ForkResult::Parent { child } => {
            let _ = env.system.close(write_end);

            let mut output = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let read = env.system.read(read_end, &mut chunk)?;
                if read == 0 {
                    break;
                }
                output.extend_from_slice(&chunk[..read]);
            }
            let _ = env.system.close(read_end);
            let _ = env.system.waitpid(child)?;

            Ok(String::from_utf8_lossy(&output).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_dollar_paren_delimiters() {
        assert_eq!(inner_command_text("$(echo hi)"), "echo hi");
    }

    #[test]
    fn leaves_unrecognized_text_untouched() {
        assert_eq!(inner_command_text("echo hi"), "echo hi");
    }

    #[test]
    fn trims_single_trailing_newline() {
        assert_eq!(trim_trailing_newlines("hi\n".to_string()), "hi");
    }

    #[test]
    fn trims_multiple_trailing_newlines() {
        assert_eq!(trim_trailing_newlines("hi\n\n\n".to_string()), "hi");
    }

    #[test]
    fn no_trailing_newline_is_unchanged() {
        assert_eq!(trim_trailing_newlines("hi".to_string()), "hi");
    }

    #[test]
    fn captures_real_command_output() {
        let mut env = Env::new_real();
        let tree = msh_syntax::Tree::parse("echo $(echo captured)\n").unwrap();
        let kinds = msh_syntax::Kinds::get();
        let command = tree.root().named_children().into_iter().next().unwrap();
        let subst = command
            .named_children()
            .into_iter()
            .find(|n| n.symbol() == kinds.command_substitution)
            .expect("command_substitution node");
        let (value, error) = expand(subst, &mut env);
        assert_eq!(value, "captured");
        assert_eq!(error, None);
    }
}
