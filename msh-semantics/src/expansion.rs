// This file is part of msh, a POSIX-subset shell implementation.

//! Single-argument word expansion (SPEC_FULL.md §4.2.1).
//!
//! [`expand_argument`] turns one tree-sitter node — a `word`, `raw_string`,
//! `string`, `simple_expansion`, `expansion`, or `command_substitution` — into
//! the concrete string an `ArgVector` slot should hold. It never fails in a
//! way that aborts the caller: allocation or substitution trouble degrades to
//! an empty string plus a [`ExpansionError`] the caller may log.

pub mod command_subst;

use msh_env::Env;
use msh_syntax::{Kinds, Node};

/// Non-fatal expansion trouble. The evaluator never aborts a statement
/// because of one of these; it logs and proceeds with whatever was built
/// (SPEC_FULL.md §7).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExpansionError {
    #[error("out of memory while expanding a word")]
    OutOfMemory,
    #[error("command substitution failed")]
    SubstitutionFailed,
}

/// Expands one argument-like node to its string value.
///
/// Returns `(value, error)`; `error` is `Some` only to report a
/// [`ExpansionError`] to the caller for diagnostics. `value` is always a
/// valid (possibly empty) string — expansion never "fails" into nothing.
pub fn expand_argument(node: Node<'_>, env: &mut Env) -> (String, Option<ExpansionError>) {
    let kinds = Kinds::get();
    let symbol = node.symbol();

    if symbol == kinds.word || symbol == kinds.variable_name {
        return (node.byte_slice().to_string(), None);
    }

    if symbol == kinds.raw_string {
        return (strip_outer_quote(node.byte_slice(), '\''), None);
    }

    if symbol == kinds.string {
        return expand_double_quoted(node, env);
    }

    if symbol == kinds.simple_expansion {
        return expand_simple(node, env);
    }

    if symbol == kinds.expansion {
        return expand_braced(node, env);
    }

    if symbol == kinds.command_substitution {
        return command_subst::expand(node, env);
    }

    // Unknown subform: return the raw bytes, matching the original
    // implementation's fallback for grammar constructs this core doesn't
    // model (SPEC_FULL.md §4.2.1, "Unknown subforms return the raw bytes").
    (node.byte_slice().to_string(), None)
}

/// Removes exactly one layer of matching `quote` characters from the start
/// and end of `text`, if both are present. Used for `'...'` and, as a
/// fallback, empty `"..."`.
fn strip_outer_quote(text: &str, quote: char) -> String {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0] == quote as u8 && bytes[bytes.len() - 1] == quote as u8 {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

fn expand_double_quoted(node: Node<'_>, env: &mut Env) -> (String, Option<ExpansionError>) {
    let children = node.named_children();
    if children.is_empty() {
        return (strip_outer_quote(node.byte_slice(), '"'), None);
    }

    let kinds = Kinds::get();
    let mut out = String::new();
    let mut first_error = None;
    for child in children {
        if child.symbol() == kinds.string_content {
            out.push_str(child.byte_slice());
            continue;
        }
        let (value, error) = expand_argument(child, env);
        out.push_str(&value);
        first_error = first_error.or(error);
    }
    (out, first_error)
}

fn expand_simple(node: Node<'_>, env: &mut Env) -> (String, Option<ExpansionError>) {
    let text = node.byte_slice();
    if text == "$$" {
        return (env.system.getpid().to_string(), None);
    }
    if text == "$?" {
        return (env.last_status.to_string(), None);
    }

    let kinds = Kinds::get();
    if let Some(first) = node.named_children().into_iter().next() {
        if first.symbol() == kinds.variable_name {
            return (lookup(env, first.byte_slice()), None);
        }
    }
    (text.to_string(), None)
}

fn expand_braced(node: Node<'_>, env: &mut Env) -> (String, Option<ExpansionError>) {
    let kinds = Kinds::get();
    if let Some(first) = node.named_children().into_iter().next() {
        if first.symbol() == kinds.variable_name {
            return (lookup(env, first.byte_slice()), None);
        }
    }
    (node.byte_slice().to_string(), None)
}

fn lookup(env: &Env, name: &str) -> String {
    env.variables.get(name).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use msh_syntax::Tree;

    fn first_command(tree: &Tree) -> Node<'_> {
        tree.root().named_children().into_iter().next().unwrap()
    }

    fn argument_nodes<'a>(command: Node<'a>) -> Vec<Node<'a>> {
        let kinds = Kinds::get();
        command
            .named_children()
            .into_iter()
            .filter(|n| n.symbol() != kinds.command_name)
            .collect()
    }

    #[test]
    fn word_expands_to_literal_bytes() {
        let tree = Tree::parse("echo hello\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        let (value, error) = expand_argument(args[0], &mut env);
        assert_eq!(value, "hello");
        assert_eq!(error, None);
    }

    #[test]
    fn single_quoted_string_is_literal() {
        let tree = Tree::parse("echo 'a b'\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "a b");
    }

    #[test]
    fn dollar_question_reads_last_status() {
        let tree = Tree::parse("echo $?\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        env.set_last_status(7);
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "7");
    }

    #[test]
    fn dollar_dollar_reads_pid() {
        let tree = Tree::parse("echo $$\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, std::process::id().to_string());
    }

    #[test]
    fn unset_variable_in_double_quotes_is_empty() {
        let tree = Tree::parse("echo \"$UNSET_MSH_TEST_VAR\"\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "");
    }

    #[test]
    fn set_variable_in_double_quotes_expands() {
        let tree = Tree::parse("echo \"$X\"\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        env.assign("X", "42");
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "42");
    }

    #[test]
    fn braced_expansion_reads_variable() {
        let tree = Tree::parse("echo ${X}\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        env.assign("X", "value");
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "value");
    }

    #[test]
    fn empty_double_quoted_string_is_empty() {
        let tree = Tree::parse("echo \"\"\n").unwrap();
        let command = first_command(&tree);
        let args = argument_nodes(command);
        let mut env = Env::new_real();
        let (value, _) = expand_argument(args[0], &mut env);
        assert_eq!(value, "");
    }
}
