// This file is part of msh, a POSIX-subset shell implementation.

//! Redirection planning and application (SPEC_FULL.md §4.3).
//!
//! Planning (parsing the operator, expanding the destination) happens once,
//! in the parent, before any `fork` that will use the result — applying a
//! plan (`open`+`dup2`+`close`) happens in the child, right before `exec`.

use std::ffi::CString;

use msh_env::io::Fd;
use msh_env::system::{Errno, OpenMode};
use msh_env::Env;
use msh_syntax::{Kinds, Node};

use crate::expansion::expand_argument;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    InputFrom,
    OutputTrunc,
    OutputAppend,
}

impl Direction {
    fn target_fd(self) -> Fd {
        match self {
            Direction::InputFrom => Fd::STDIN,
            Direction::OutputTrunc | Direction::OutputAppend => Fd::STDOUT,
        }
    }

    fn open_mode(self) -> OpenMode {
        match self {
            Direction::InputFrom => OpenMode::ReadOnly,
            Direction::OutputTrunc => OpenMode::WriteTruncate,
            Direction::OutputAppend => OpenMode::WriteAppend,
        }
    }
}

/// One `file_redirect` node, already expanded to a concrete path.
#[derive(Clone, Debug)]
pub struct PlannedRedirect {
    direction: Direction,
    path: String,
}

/// A planned redirection's target file could not be opened.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("cannot open redirect target: {0}")]
pub struct RedirOpenFailed(pub Errno);

/// Collects every `file_redirect` child of `nodes` and plans it: detects the
/// operator, expands the destination. Does not touch the filesystem.
pub fn plan(nodes: &[Node<'_>], env: &mut Env) -> Vec<PlannedRedirect> {
    let kinds = Kinds::get();
    nodes
        .iter()
        .filter(|node| node.symbol() == kinds.file_redirect)
        .map(|node| plan_one(*node, env))
        .collect()
}

fn plan_one(node: Node<'_>, env: &mut Env) -> PlannedRedirect {
    let kinds = Kinds::get();
    let destination = node.child_by_field(kinds.field_destination);
    let (path, _) = expand_argument(destination, env);

    let operator_text = &node.byte_slice()[..destination_offset(node, destination)];
    let direction = detect_direction(operator_text);

    PlannedRedirect { direction, path }
}

/// Byte offset, relative to `node`'s own start, where `destination` begins —
/// everything before that is operator bytes (plus leading whitespace).
fn destination_offset(node: Node<'_>, destination: Node<'_>) -> usize {
    if destination.is_null() {
        return node.byte_slice().len();
    }
    destination.start_byte().saturating_sub(node.start_byte())
}

fn detect_direction(operator_text: &str) -> Direction {
    let trimmed = operator_text.trim_start();
    if trimmed.starts_with(">>") {
        Direction::OutputAppend
    } else if trimmed.starts_with('>') {
        Direction::OutputTrunc
    } else {
        Direction::InputFrom
    }
}

/// Applies every planned redirect in order: `open`s the target, `dup2`s it
/// onto the direction's fixed descriptor, then closes the now-duplicated
/// original. Later redirects of the same direction win, since each `dup2`
/// simply overwrites the previous one on that descriptor — no FD leaks
/// because the just-opened FD is always closed right after the `dup2`.
///
/// Meant to be called in a forked child, immediately before `exec`.
pub fn apply(
    redirects: &[PlannedRedirect],
    system: &mut dyn msh_env::System,
) -> Result<(), RedirOpenFailed> {
    for redirect in redirects {
        let path = CString::new(redirect.path.as_str()).map_err(|_| RedirOpenFailed(Errno(0)))?;
        let opened = system
            .open(&path, redirect.direction.open_mode())
            .map_err(|e| RedirOpenFailed(Errno::from(e)))?;
        let target = redirect.direction.target_fd();
        let _ = system.dup2(opened, target);
        let _ = system.close(opened);
    }
    Ok(())
}

/// Opens one planned redirect's target file without touching any fixed
/// descriptor, returning the opened fd and whether it is the input side.
/// Used by `redirected_statement` evaluation, which hands the resulting fd
/// down as an inherited `in_fd`/`out_fd` rather than `dup2`-ing it directly
/// (that `dup2` happens later, in the forked child, via
/// [`crate::launcher::run_command`]).
pub fn open_for_statement(
    redirect: &PlannedRedirect,
    system: &mut dyn msh_env::System,
) -> Result<(Fd, bool), RedirOpenFailed> {
    let path = CString::new(redirect.path.as_str()).map_err(|_| RedirOpenFailed(Errno(0)))?;
    let fd = system
        .open(&path, redirect.direction.open_mode())
        .map_err(|e| RedirOpenFailed(Errno::from(e)))?;
    let is_input = matches!(redirect.direction, Direction::InputFrom);
    Ok((fd, is_input))
}
