// This file is part of msh, a POSIX-subset shell implementation.

//! Statement Evaluator: the top-level dispatch table (SPEC_FULL.md §4.6).

use msh_env::io::Fd;
use msh_env::Env;
use msh_syntax::{Kinds, Node};

use crate::expansion::expand_argument;
use crate::pipeline::run_pipeline;
use crate::redir;

/// Evaluates one statement node, updating `env.last_status` as a side
/// effect and also returning it for callers that chain evaluations (`list`,
/// `and_or`) without re-reading `env`.
pub fn evaluate(node: Node<'_>, env: &mut Env) -> i32 {
    let kinds = Kinds::get();
    let symbol = node.symbol();

    let status = if symbol == kinds.comment {
        0
    } else if symbol == kinds.variable_assignment {
        evaluate_assignment(node, env)
    } else if symbol == kinds.command {
        crate::launcher::run_command(node, env, Fd::NONE, Fd::NONE)
    } else if symbol == kinds.pipeline {
        run_pipeline(node, env, Fd::NONE, Fd::NONE)
    } else if symbol == kinds.redirected_statement {
        evaluate_redirected(node, env)
    } else if symbol == kinds.list {
        evaluate_list(node, env)
    } else if symbol == kinds.and_or {
        evaluate_and_or(node, env)
    } else {
        eprintln!("msh: cannot evaluate statement: unknown kind");
        1
    };

    env.set_last_status(status);
    status
}

fn evaluate_assignment(node: Node<'_>, env: &mut Env) -> i32 {
    let kinds = Kinds::get();
    let name = node.child_by_field(kinds.field_name);
    let value = node.child_by_field(kinds.field_value);
    let (value, _) = expand_argument(value, env);
    env.assign(name.byte_slice(), &value);
    0
}

fn evaluate_redirected(node: Node<'_>, env: &mut Env) -> i32 {
    let kinds = Kinds::get();
    let body = node.child_by_field(kinds.field_body);
    let redirect_nodes = node.named_children();
    let planned = redir::plan(&redirect_nodes, env);

    let (read_end, write_end) = match open_planned(&planned, env) {
        Ok(ends) => ends,
        Err(error) => {
            eprintln!("msh: cannot open redirect target: {error}");
            return 1;
        }
    };

    let status = if body.symbol() == kinds.pipeline {
        run_pipeline(body, env, read_end, write_end)
    } else if body.symbol() == kinds.command {
        crate::launcher::run_command(body, env, read_end, write_end)
    } else {
        evaluate(body, env)
    };

    if !read_end.is_none() {
        let _ = env.system.close(read_end);
    }
    if !write_end.is_none() {
        let _ = env.system.close(write_end);
    }
    status
}

/// Opens every planned redirect in the parent and returns the resulting
/// `(in_fd, out_fd)` pair to hand to the body as inherited descriptors.
/// This is a simplification for the single-destination common case this
/// core targets; §4.3's "later wins" rule still applies since opening in
/// order and keeping only the last fd per direction matches the same
/// observable behavior without needing `dup2` twice.
///
/// If a later redirect fails to open, whatever `in_fd`/`out_fd` an earlier
/// one already produced is closed before the error propagates — otherwise
/// it would leak into the parent for the rest of the shell's lifetime.
fn open_planned(
    planned: &[redir::PlannedRedirect],
    env: &mut Env,
) -> Result<(Fd, Fd), redir::RedirOpenFailed> {
    let mut in_fd = Fd::NONE;
    let mut out_fd = Fd::NONE;
    for redirect in planned {
        let (fd, is_input) = match redir::open_for_statement(redirect, env.system.as_mut()) {
            Ok(opened) => opened,
            Err(error) => {
                if !in_fd.is_none() {
                    let _ = env.system.close(in_fd);
                }
                if !out_fd.is_none() {
                    let _ = env.system.close(out_fd);
                }
                return Err(error);
            }
        };
        if is_input {
            if !in_fd.is_none() {
                let _ = env.system.close(in_fd);
            }
            in_fd = fd;
        } else {
            if !out_fd.is_none() {
                let _ = env.system.close(out_fd);
            }
            out_fd = fd;
        }
    }
    Ok((in_fd, out_fd))
}

fn evaluate_list(node: Node<'_>, env: &mut Env) -> i32 {
    let children = node.named_children();
    let source = node.byte_slice();
    let base = node.start_byte();
    let mut status = 0;
    let mut previous: Option<Node<'_>> = None;

    for child in children {
        let operator = previous.map(|prev| {
            recover_operator(source, prev.end_byte() - base, child.start_byte() - base)
        });
        let should_run = match operator {
            None => true,
            Some(Operator::And) => status == 0,
            Some(Operator::Or) => status != 0,
            Some(Operator::Seq) | Some(Operator::Background) => true,
        };
        if should_run {
            status = evaluate(child, env);
        }
        previous = Some(child);
    }
    status
}

fn evaluate_and_or(node: Node<'_>, env: &mut Env) -> i32 {
    let kinds = Kinds::get();
    let left = node.child_by_field(kinds.field_left);
    let operator_node = node.child_by_field(kinds.field_operator);
    let right = node.child_by_field(kinds.field_right);

    let left_status = evaluate(left, env);
    let operator = parse_operator(operator_node.byte_slice());

    let should_run_right = match operator {
        Operator::And => left_status == 0,
        Operator::Or => left_status != 0,
        Operator::Seq | Operator::Background => true,
    };

    if should_run_right && !right.is_null() {
        evaluate(right, env)
    } else {
        left_status
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operator {
    And,
    Or,
    Seq,
    Background,
}

fn parse_operator(text: &str) -> Operator {
    if text.starts_with("&&") {
        Operator::And
    } else if text.starts_with("||") {
        Operator::Or
    } else if text.starts_with('&') {
        Operator::Background
    } else {
        Operator::Seq
    }
}

/// Recovers the sequence operator between two `list` siblings by scanning
/// the raw source bytes between them, per SPEC_FULL.md §6.
fn recover_operator(source: &str, end_prev: usize, start_next: usize) -> Operator {
    let span = &source[end_prev.min(source.len())..start_next.min(source.len())];
    let trimmed = span.trim_start();
    parse_operator(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use msh_syntax::Tree;

    fn root_statement(tree: &Tree) -> Node<'_> {
        tree.root().named_children().into_iter().next().unwrap()
    }

    #[test]
    fn comment_is_a_no_op() {
        let tree = Tree::parse("# hello\n").unwrap();
        let mut env = Env::new_real();
        let status = evaluate(root_statement(&tree), &mut env);
        assert_eq!(status, 0);
    }

    #[test]
    fn assignment_updates_variable_table_and_succeeds() {
        let tree = Tree::parse("X=42\n").unwrap();
        let mut env = Env::new_real();
        let status = evaluate(root_statement(&tree), &mut env);
        assert_eq!(status, 0);
        assert_eq!(env.variables.get("X"), Some("42"));
    }

    #[test]
    fn parse_operator_recognizes_every_form() {
        assert_eq!(parse_operator("&&"), Operator::And);
        assert_eq!(parse_operator("||"), Operator::Or);
        assert_eq!(parse_operator(";"), Operator::Seq);
        assert_eq!(parse_operator("&"), Operator::Background);
    }

    #[test]
    fn recover_operator_skips_leading_whitespace() {
        let source = "a   && b";
        let end_of_a = 1;
        let start_of_b = source.len() - 1;
        assert_eq!(recover_operator(source, end_of_a, start_of_b), Operator::And);
    }
}
