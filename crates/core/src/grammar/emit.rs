//! Selection emitter: converts finished paths back into selection text.
//!
//! The flat layout joins every path with the nested-field delimiter and the
//! paths with the fields delimiter; re-parsing it yields the same paths in the
//! same order. The grouped layout folds shared prefixes back into groups
//! (`a(b,c)`), which re-parses to the same set of paths with duplicates
//! removed. Segments are written verbatim, so paths built by hand must not
//! contain delimiter characters.

use crate::field::FieldPath;
use crate::selection::Selection;

use super::tables::DelimiterTable;

// ── Configuration ───────────────────────────────────────────────────────

/// Output layout for emitted selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One fully spelled-out path per entry: `a/b,a/c`.
    #[default]
    Flat,
    /// Shared prefixes folded into groups: `a(b,c)`.
    Grouped,
}

/// Configuration for the selection emitter.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Output layout.
    pub layout: Layout,
}

// ── Public API ──────────────────────────────────────────────────────────

/// Emit `selection` using the primary characters of `table`.
pub fn emit_selection(selection: &Selection, table: &DelimiterTable, config: &EmitConfig) -> String {
    match config.layout {
        Layout::Flat => emit_flat(selection.paths(), table),
        Layout::Grouped => emit_grouped(selection.paths(), table),
    }
}

// ── Flat ────────────────────────────────────────────────────────────────

fn emit_flat(paths: &[FieldPath], table: &DelimiterTable) -> String {
    let nested = table.primary_nested().to_string();
    let fields = table.primary_fields().to_string();
    paths
        .iter()
        .map(|p| p.segments().join(&nested))
        .collect::<Vec<_>>()
        .join(&fields)
}

// ── Grouped ─────────────────────────────────────────────────────────────

const ROOT: usize = 0;

/// Prefix tree stored as an arena; children keep first-seen order.
///
/// Building, walking, and dropping the tree are all iterative, so path depth
/// is bounded only by memory.
#[derive(Debug)]
struct Trie<'p> {
    nodes: Vec<Node<'p>>,
}

#[derive(Debug, Default)]
struct Node<'p> {
    name: &'p str,
    terminal: bool,
    children: Vec<usize>,
}

impl Node<'_> {
    /// Entries this node adds to its parent's list: its own name when it
    /// ends a path, plus one entry covering all of its children.
    fn entry_count(&self) -> usize {
        usize::from(self.terminal) + usize::from(!self.children.is_empty())
    }
}

impl<'p> Trie<'p> {
    fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    fn insert(&mut self, segments: &'p [String]) {
        let mut at = ROOT;
        for segment in segments {
            let found = self.nodes[at]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].name == segment.as_str());
            at = match found {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node {
                        name: segment.as_str(),
                        ..Default::default()
                    });
                    self.nodes[at].children.push(child);
                    child
                }
            };
        }
        self.nodes[at].terminal = true;
    }
}

/// Pending output; popped off a stack in order.
enum Piece<'p> {
    Node(usize),
    Name(&'p str),
    Delim(char),
}

fn emit_grouped(paths: &[FieldPath], table: &DelimiterTable) -> String {
    let mut trie = Trie::new();
    for path in paths {
        trie.insert(path.segments());
    }

    let fields = table.primary_fields();
    let mut out = String::new();
    let mut stack = Vec::new();
    push_list(&trie.nodes[ROOT].children, fields, &mut stack);

    while let Some(piece) = stack.pop() {
        let idx = match piece {
            Piece::Name(name) => {
                out.push_str(name);
                continue;
            }
            Piece::Delim(c) => {
                out.push(c);
                continue;
            }
            Piece::Node(idx) => idx,
        };

        // Pushed in reverse: `name`, then `name/only` or `name(x,y)`.
        let node = &trie.nodes[idx];
        if !node.children.is_empty() {
            let nested: usize = node
                .children
                .iter()
                .map(|&c| trie.nodes[c].entry_count())
                .sum();
            if nested == 1 {
                push_list(&node.children, fields, &mut stack);
                stack.push(Piece::Delim(table.primary_nested()));
            } else {
                stack.push(Piece::Delim(table.primary_group_end()));
                push_list(&node.children, fields, &mut stack);
                stack.push(Piece::Delim(table.primary_group_start()));
            }
            stack.push(Piece::Name(node.name));
            if node.terminal {
                stack.push(Piece::Delim(fields));
            }
        }
        if node.terminal {
            stack.push(Piece::Name(node.name));
        }
    }
    out
}

/// Queue `children` separated by `fields` so that they pop in order.
fn push_list(children: &[usize], fields: char, stack: &mut Vec<Piece<'_>>) {
    for (i, &child) in children.iter().enumerate().rev() {
        stack.push(Piece::Node(child));
        if i > 0 {
            stack.push(Piece::Delim(fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parser::parse_str;

    fn grouped(input: &str) -> String {
        let sel = parse_str(input).unwrap();
        emit_selection(
            &sel,
            DelimiterTable::standard(),
            &EmitConfig {
                layout: Layout::Grouped,
            },
        )
    }

    fn flat(input: &str) -> String {
        let sel = parse_str(input).unwrap();
        emit_selection(&sel, DelimiterTable::standard(), &EmitConfig::default())
    }

    #[test]
    fn flat_spells_out_every_path() {
        assert_eq!(flat("foo(bar,baz),qux"), "foo/bar,foo/baz,qux");
        assert_eq!(flat(" foo ( bar / baz ) "), "foo/bar/baz");
        assert_eq!(flat(""), "");
    }

    #[test]
    fn grouped_folds_shared_prefixes() {
        assert_eq!(grouped("foo/bar,foo/baz,qux"), "foo(bar,baz),qux");
        assert_eq!(grouped("a/b/c"), "a/b/c");
        assert_eq!(grouped("a/b/c,a/b/d,a/e"), "a(b(c,d),e)");
    }

    #[test]
    fn grouped_keeps_parent_and_child() {
        assert_eq!(grouped("a,a/b"), "a,a/b");
        assert_eq!(grouped("a,a/b,a/c"), "a,a(b,c)");
    }

    #[test]
    fn grouped_merges_duplicates() {
        assert_eq!(grouped("a/b,a/b"), "a/b");
    }

    #[test]
    fn custom_table_characters_are_used() {
        let opts = crate::grammar::tables::DelimiterOptions {
            fields: vec![';'],
            nested: vec!['.'],
            group_start: vec!['['],
            group_end: vec![']'],
        };
        let table = opts.table().unwrap();
        let sel = crate::grammar::parser::parse_with_table("a[b;c.d];e", &table).unwrap();
        assert_eq!(
            emit_selection(&sel, &table, &EmitConfig::default()),
            "a.b;a.c.d;e"
        );
        assert_eq!(
            emit_selection(
                &sel,
                &table,
                &EmitConfig {
                    layout: Layout::Grouped
                }
            ),
            "a[b;c.d];e"
        );
    }
}
