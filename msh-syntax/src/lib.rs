// This file is part of msh, a POSIX-subset shell implementation.

//! Typed adapter over the external syntax tree.
//!
//! This crate does not parse anything itself. It wraps `tree-sitter` and the
//! `tree-sitter-bash` grammar behind a small, typed surface: symbol kinds,
//! named children, field lookup, and byte-range slicing. Everything upstream
//! of this crate (the evaluator in `msh-semantics`) only ever sees [`Node`]
//! and [`Tree`] and never touches `tree_sitter` directly.
//!
//! The conceptual node kinds and field names the evaluator dispatches on are
//! resolved to the grammar's numeric ids exactly once, in [`Kinds::get`], so
//! that later dispatch is an integer comparison rather than a string compare.

use std::num::NonZeroU16;
use std::sync::OnceLock;
use tree_sitter::Parser;

pub use tree_sitter::Node as RawNode;
pub use tree_sitter::Tree as RawTree;

/// Numeric ids for the node kinds and fields the evaluator cares about,
/// resolved against the `tree-sitter-bash` grammar at first use.
///
/// A kind or field that the installed grammar does not define resolves to
/// `0`, which `tree-sitter` never assigns to a real node, so comparisons
/// against it simply never match instead of panicking.
pub struct Kinds {
    pub program: u16,
    pub comment: u16,
    pub variable_assignment: u16,
    pub command: u16,
    pub command_name: u16,
    pub word: u16,
    pub string: u16,
    pub raw_string: u16,
    pub string_content: u16,
    pub simple_expansion: u16,
    pub expansion: u16,
    pub variable_name: u16,
    pub command_substitution: u16,
    pub pipeline: u16,
    pub file_redirect: u16,
    pub redirected_statement: u16,
    pub list: u16,
    pub and_or: u16,

    pub field_body: u16,
    pub field_condition: u16,
    pub field_name: u16,
    pub field_left: u16,
    pub field_right: u16,
    pub field_operator: u16,
    pub field_value: u16,
    pub field_redirect: u16,
    pub field_destination: u16,
    pub field_variable: u16,
}

impl Kinds {
    /// Returns the process-wide [`Kinds`] table, building it on first call.
    pub fn get() -> &'static Kinds {
        static KINDS: OnceLock<Kinds> = OnceLock::new();
        KINDS.get_or_init(|| {
            let language = tree_sitter_bash::language();
            let kind = |name: &str| language.id_for_node_kind(name, true);
            let field = |name: &str| language.field_id_for_name(name).map_or(0, |id| id.get());
            Kinds {
                program: kind("program"),
                comment: kind("comment"),
                variable_assignment: kind("variable_assignment"),
                command: kind("command"),
                command_name: kind("command_name"),
                word: kind("word"),
                string: kind("string"),
                raw_string: kind("raw_string"),
                string_content: kind("string_content"),
                simple_expansion: kind("simple_expansion"),
                expansion: kind("expansion"),
                variable_name: kind("variable_name"),
                command_substitution: kind("command_substitution"),
                pipeline: kind("pipeline"),
                file_redirect: kind("file_redirect"),
                redirected_statement: kind("redirected_statement"),
                list: kind("list"),
                and_or: kind("and_or"),

                field_body: field("body"),
                field_condition: field("condition"),
                field_name: field("name"),
                field_left: field("left"),
                field_right: field("right"),
                field_operator: field("operator"),
                field_value: field("value"),
                field_redirect: field("redirect"),
                field_destination: field("destination"),
                field_variable: field("variable"),
            }
        })
    }
}

/// Error constructing a [`Tree`] from source text.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The underlying parser could not be configured with the bash grammar.
    #[error("could not load the bash grammar")]
    LanguageUnavailable,
    /// `tree-sitter` failed to produce a tree (it returns `None` only when
    /// cancelled or given an unsupported encoding; neither applies here, but
    /// the fallible API still has to be handled).
    #[error("parser produced no tree")]
    NoTree,
}

/// One parsed script together with the source bytes it was parsed from.
///
/// A `Tree` borrows nothing; every [`Node`] handed out of it borrows the
/// `Tree` itself, so all node references are invalidated together when the
/// `Tree` is dropped at the end of one evaluation.
pub struct Tree {
    source: String,
    tree: RawTree,
}

impl Tree {
    /// Parses `source` with `tree-sitter-bash`.
    pub fn parse(source: &str) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_bash::language())
            .map_err(|_| ParseError::LanguageUnavailable)?;
        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        Ok(Tree {
            source: source.to_owned(),
            tree,
        })
    }

    /// The root `program` node.
    pub fn root(&self) -> Node<'_> {
        Node {
            raw: Some(self.tree.root_node()),
            source: &self.source,
        }
    }

    /// The source text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A borrowed view into a [`Tree`], or the absence of one.
///
/// `Node` is `Copy`, so passing it down the evaluator's recursive calls is
/// free. A node with no underlying `tree-sitter` node (an absent optional
/// field, or a child that doesn't exist) is represented as `raw: None`
/// rather than panicking; callers check [`Node::is_null`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    raw: Option<RawNode<'tree>>,
    source: &'tree str,
}

impl<'tree> Node<'tree> {
    /// The node's grammar symbol id. Compare against [`Kinds`] fields.
    /// Returns `0` (never a real symbol id) for a null node.
    pub fn symbol(&self) -> u16 {
        self.raw.map_or(0, |n| n.kind_id())
    }

    /// Whether this handle refers to no node.
    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    pub fn start_byte(&self) -> usize {
        self.raw.map_or(0, |n| n.start_byte())
    }

    pub fn end_byte(&self) -> usize {
        self.raw.map_or(0, |n| n.end_byte())
    }

    /// The source bytes spanned by this node, verbatim. Empty for a null
    /// node.
    pub fn byte_slice(&self) -> &'tree str {
        match self.raw {
            Some(n) => &self.source[n.start_byte()..n.end_byte()],
            None => "",
        }
    }

    /// Named children in source order (anonymous tokens like `(`/`)`/`|`
    /// are skipped, matching `tree-sitter`'s `is_named` distinction).
    pub fn named_children(&self) -> Vec<Node<'tree>> {
        let Some(raw) = self.raw else {
            return Vec::new();
        };
        let source = self.source;
        let mut cursor = raw.walk();
        raw.named_children(&mut cursor)
            .map(|raw| Node {
                raw: Some(raw),
                source,
            })
            .collect()
    }

    /// The child attached to the given field id. Null if the field is
    /// absent or this node is itself null.
    pub fn child_by_field(&self, field_id: u16) -> Node<'tree> {
        let child = self.raw.and_then(|raw| {
            NonZeroU16::new(field_id).and_then(|id| raw.child_by_field_id(id))
        });
        Node {
            raw: child,
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Tree {
        Tree::parse(src).expect("parse")
    }

    #[test]
    fn root_is_program() {
        let tree = parse("echo hi\n");
        let kinds = Kinds::get();
        assert_eq!(tree.root().symbol(), kinds.program);
    }

    #[test]
    fn byte_slice_is_verbatim() {
        let tree = parse("echo hello world\n");
        assert_eq!(tree.root().byte_slice().trim_end(), "echo hello world");
    }

    #[test]
    fn command_has_command_name_child() {
        let tree = parse("echo hi\n");
        let kinds = Kinds::get();
        let program = tree.root();
        let command = program.named_children().into_iter().next().expect("command node");
        assert_eq!(command.symbol(), kinds.command);
        let has_command_name = command
            .named_children()
            .into_iter()
            .any(|c| c.symbol() == kinds.command_name);
        assert!(has_command_name);
    }

    #[test]
    fn absent_field_is_null() {
        let tree = parse("echo hi\n");
        let command = tree.root().named_children().into_iter().next().unwrap();
        let missing = command.child_by_field(u16::MAX);
        assert!(missing.is_null());
        assert_eq!(missing.byte_slice(), "");
    }

    #[test]
    fn kinds_table_is_cached_across_calls() {
        let a = Kinds::get() as *const Kinds;
        let b = Kinds::get() as *const Kinds;
        assert_eq!(a, b);
    }
}
