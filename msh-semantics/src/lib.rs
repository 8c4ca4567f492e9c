// This file is part of msh, a POSIX-subset shell implementation.

//! Evaluator core: parses one script and runs it to completion against an
//! [`Env`], in the order SPEC_FULL.md lays out — expansion, redirection,
//! process launching, pipelines, then the statement dispatch table that
//! ties them together.

pub mod command;
pub mod exit_status;
pub mod expansion;
pub mod launcher;
pub mod pipeline;
pub mod redir;
pub mod statement;

use msh_env::Env;
use msh_syntax::{ParseError, Tree};

/// Parses `source` and evaluates every top-level statement in order,
/// updating `env.last_status` along the way. Returns the final
/// `last_status`, matching the shell's own exit status on EOF.
///
/// A syntax error yields `last_status = 1` without running anything, since
/// this core has no partial-recovery story for malformed input.
pub fn execute_script(source: &str, env: &mut Env) -> i32 {
    let tree = match Tree::parse(source) {
        Ok(tree) => tree,
        Err(ParseError::LanguageUnavailable) | Err(ParseError::NoTree) => {
            eprintln!("msh: could not parse script");
            env.set_last_status(1);
            return 1;
        }
    };

    let mut status = 0;
    for child in tree.root().named_children() {
        status = statement::evaluate(child, env);
    }
    status
}
