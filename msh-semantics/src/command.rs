// This file is part of msh, a POSIX-subset shell implementation.

//! Command-to-`ArgVector` construction (SPEC_FULL.md §4.2.2).

use msh_env::Env;
use msh_syntax::{Kinds, Node};

use crate::expansion::expand_argument;

/// A `command` node could not be turned into an argument vector because it
/// has no program-name child at all (every node was a redirect or
/// assignment). The statement evaluator treats this as status 1.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("command has no program name")]
pub struct MissingProgramName;

/// Builds the ordered argument vector for a `command` node: `argv[0]` is the
/// program name, the rest are fully expanded arguments in source order.
pub fn build_argv(command: Node<'_>, env: &mut Env) -> Result<Vec<String>, MissingProgramName> {
    let kinds = Kinds::get();
    let children = command.named_children();

    let command_name = children
        .iter()
        .find(|child| child.symbol() == kinds.command_name)
        .copied();

    let mut argv = Vec::with_capacity(children.len());

    if let Some(container) = command_name {
        let program = container
            .named_children()
            .into_iter()
            .next()
            .ok_or(MissingProgramName)?;
        let (value, _) = expand_argument(program, env);
        argv.push(value);
    }

    // With no `command_name` container, the first argument-like child
    // becomes `argv[0]` simply by being pushed first here (SPEC_FULL.md
    // §4.2.2 rule 1, second branch).
    for child in &children {
        let symbol = child.symbol();
        if symbol == kinds.command_name
            || symbol == kinds.file_redirect
            || symbol == kinds.variable_assignment
        {
            continue;
        }
        let (value, _) = expand_argument(*child, env);
        argv.push(value);
    }

    if argv.is_empty() {
        return Err(MissingProgramName);
    }
    Ok(argv)
}
