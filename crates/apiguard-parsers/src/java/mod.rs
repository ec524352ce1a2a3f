use std::collections::HashMap;
use std::path::Path;

use apiguard_core::ast::{NodeId, NodeKind, Span, SyntaxTree};
use tree_sitter::{Language, Node, Parser};

/// Operators that make a `binary_expression` a comparison guard.
const COMPARISON_OPS: &[&str] = &["<=", ">=", "==", "!=", "<", ">"];

pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Parse Java source and lower it into an apiguard [`SyntaxTree`].
    ///
    /// Syntax errors do not fail the parse: tree-sitter recovers, and the
    /// affected constructs come out with their optional roles unset.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let lang: Language = tree_sitter_java::LANGUAGE.into();
        self.parser
            .set_language(&lang)
            .map_err(|e| ParseError::Language(format!("{e}")))?;
        let ts_tree = self
            .parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::ParseFailed)?;

        let root = ts_tree.root_node();
        if root.has_error() {
            tracing::debug!("java source contains syntax errors; lowering best-effort");
        }
        let mut lowering = Lowering {
            src: source.as_bytes(),
            tree: SyntaxTree::new(source),
            lowered: HashMap::new(),
        };
        lowering.lower(root);
        Ok(lowering.tree)
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<SyntaxTree, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse(&source)
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("language error: {0}")]
    Language(String),
    #[error("parse failed")]
    ParseFailed,
}

pub fn detect_language(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "java" => Some("java"),
        _ => None,
    }
}

struct Lowering<'s> {
    src: &'s [u8],
    tree: SyntaxTree,
    /// tree-sitter node id → lowered id, for resolving role fields.
    lowered: HashMap<usize, NodeId>,
}

impl Lowering<'_> {
    /// Lower the named, non-extra nodes under `root` in pre-order, then
    /// classify each once its children have ids. Walks with a cursor and an
    /// explicit parent stack so nesting depth is bounded by the heap.
    fn lower(&mut self, root: Node<'_>) {
        let mut cursor = root.walk();
        // (lowered id, tree-sitter kind) of each node the cursor is inside
        let mut parents: Vec<(NodeId, &'static str)> = Vec::new();
        let mut pending: Vec<(Node<'_>, NodeId, Option<&'static str>)> = Vec::new();

        'walk: loop {
            let node = cursor.node();
            if node.is_named() && !node.is_extra() {
                let id = self.tree.push(
                    NodeKind::Other,
                    parents.last().map(|(p, _)| *p),
                    Span::new(node.start_byte(), node.end_byte()),
                    node.start_position().row as u32 + 1,
                );
                self.lowered.insert(node.id(), id);
                pending.push((node, id, parents.last().map(|(_, k)| *k)));
                if cursor.goto_first_child() {
                    parents.push((id, node.kind()));
                    continue;
                }
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
                parents.pop();
            }
        }

        for (node, id, parent_kind) in pending {
            let kind = self.classify(node, parent_kind);
            self.tree.set_kind(id, kind);
        }
    }

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|c| self.text(c).to_string())
            .filter(|t| !t.is_empty())
    }

    fn classify(&self, node: Node<'_>, parent_kind: Option<&str>) -> NodeKind {
        let field = |name: &str| -> Option<NodeId> {
            let child = node.child_by_field_name(name)?;
            self.lowered.get(&child.id()).copied()
        };

        match node.kind() {
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                NodeKind::Function {
                    name: self.field_text(node, "name").unwrap_or_default(),
                }
            }
            "lambda_expression" => NodeKind::Lambda,
            "static_initializer" => NodeKind::Initializer,
            "block" if parent_kind == Some("class_body") => {
                NodeKind::Initializer
            }
            "block" | "constructor_body" => NodeKind::Block,
            "class_body" | "interface_body" | "enum_body" | "annotation_type_body" => {
                NodeKind::ClassBody
            }
            "if_statement" => NodeKind::If {
                condition: field("condition"),
                alternative: field("alternative"),
            },
            "while_statement" => NodeKind::While {
                condition: field("condition"),
            },
            "try_statement" | "try_with_resources_statement" => NodeKind::Try,
            "catch_clause" | "finally_clause" => NodeKind::Handler,
            "method_invocation" => NodeKind::MethodCall {
                receiver: self.field_text(node, "object"),
                method: self.field_text(node, "name").unwrap_or_default(),
                arguments: field("arguments"),
            },
            "object_creation_expression" => NodeKind::New {
                class: self
                    .field_text(node, "type")
                    .map(|t| strip_type_arguments(&t).to_string()),
                arguments: field("arguments"),
            },
            "argument_list" => NodeKind::Arguments,
            "variable_declarator" => NodeKind::LocalVariable {
                name: self.field_text(node, "name").unwrap_or_default(),
                value: field("value"),
            },
            "assignment_expression" => NodeKind::Assignment {
                target: self.field_text(node, "left").unwrap_or_default(),
                value: field("right"),
            },
            "unary_expression" => match self.field_text(node, "operator").as_deref() {
                Some("!") => NodeKind::Not {
                    operand: field("operand"),
                },
                _ => NodeKind::Other,
            },
            "binary_expression" => match self.field_text(node, "operator") {
                Some(op) if COMPARISON_OPS.contains(&op.as_str()) => NodeKind::Comparison {
                    op,
                    left: field("left"),
                    right: field("right"),
                },
                _ => NodeKind::Other,
            },
            "parenthesized_expression" => NodeKind::Parenthesized,
            "identifier" => NodeKind::Name(self.text(node).to_string()),
            "true" | "false" => NodeKind::Literal,
            kind if kind.ends_with("_literal") => NodeKind::Literal,
            _ => NodeKind::Other,
        }
    }
}

/// `ArrayList<String>` → `ArrayList`
fn strip_type_arguments(type_text: &str) -> &str {
    match type_text.find('<') {
        Some(idx) => type_text[..idx].trim_end(),
        None => type_text.trim(),
    }
}
