//! Arena-backed view of a parsed source file.
//!
//! The host parser lowers its concrete tree into a [`SyntaxTree`]: a flat
//! `Vec<AstNode>` addressed by [`NodeId`], where every node carries a closed
//! [`NodeKind`] variant, parent/child links, its byte span, and its 1-based
//! source line. Analysis passes only ever see this view, so adding support
//! for a new construct means adding a variant here and handling it where the
//! compiler points, not teaching every walker a new string check.
//!
//! Fields that a partial or malformed tree cannot provide (a missing `if`
//! condition, a call without an argument list) are `None`; they are never
//! errors.

use serde::{Deserialize, Serialize};

/// Index of a node inside its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// The closed set of node shapes the analysis understands.
///
/// Role fields (`condition`, `arguments`, `value`, ...) point at children of
/// the same node so passes can tell a guard's test apart from its body
/// without re-inspecting the host grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Method or constructor declaration. The unit the host visits.
    Function { name: String },
    /// Lambda body; calls inside it have no modelled owner.
    Lambda,
    /// Static or instance initializer block.
    Initializer,
    /// Body of a class, interface, enum or anonymous class.
    ClassBody,
    Block,
    If {
        condition: Option<NodeId>,
        alternative: Option<NodeId>,
    },
    While {
        condition: Option<NodeId>,
    },
    Try,
    /// `catch` or `finally` clause; code here is not protected by its `try`.
    Handler,
    MethodCall {
        receiver: Option<String>,
        method: String,
        arguments: Option<NodeId>,
    },
    New {
        class: Option<String>,
        arguments: Option<NodeId>,
    },
    Arguments,
    LocalVariable {
        name: String,
        value: Option<NodeId>,
    },
    Assignment {
        target: String,
        value: Option<NodeId>,
    },
    /// Logical negation `!operand`.
    Not {
        operand: Option<NodeId>,
    },
    /// Relational comparison such as `i > -1` or `n == 0`.
    Comparison {
        op: String,
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    Parenthesized,
    Name(String),
    Literal,
    Other,
}

impl NodeKind {
    /// True for nodes that close a scope when walking parent links upward.
    pub fn is_function_boundary(&self) -> bool {
        matches!(
            self,
            NodeKind::Function { .. } | NodeKind::Lambda | NodeKind::Initializer | NodeKind::ClassBody
        )
    }

    /// Method calls and object creations both count as API calls.
    pub fn is_call(&self) -> bool {
        matches!(self, NodeKind::MethodCall { .. } | NodeKind::New { .. })
    }

    pub fn arguments(&self) -> Option<NodeId> {
        match self {
            NodeKind::MethodCall { arguments, .. } | NodeKind::New { arguments, .. } => *arguments,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub span: Span,
    /// 1-based source line of the node's first byte.
    pub line: u32,
}

/// Error returned when a call cannot be attributed to an enclosing function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OwnerError {
    #[error("no enclosing function for node at line {line}")]
    NotFound { line: u32 },
}

/// One parsed source file in arena form.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<AstNode>,
}

impl SyntaxTree {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            nodes: Vec::new(),
        }
    }

    /// Append a node and link it under `parent`. Children are recorded in
    /// insertion order, which the host keeps equal to source order.
    pub fn push(&mut self, kind: NodeKind, parent: Option<NodeId>, span: Span, line: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode {
            kind,
            parent,
            children: Vec::new(),
            span,
            line,
        });
        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(p.index()) {
                parent_node.children.push(id);
            }
        }
        id
    }

    /// Replace a node's kind once its role children are known.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.kind = kind;
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    /// Kind of `id`; unknown ids read as [`NodeKind::Other`].
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        const OTHER: &NodeKind = &NodeKind::Other;
        self.get(id).map(|n| &n.kind).unwrap_or(OTHER)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|n| n.span).unwrap_or_default()
    }

    pub fn line(&self, id: NodeId) -> u32 {
        self.get(id).map(|n| n.line).unwrap_or(0)
    }

    pub fn text(&self, id: NodeId) -> &str {
        let span = self.span(id);
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// True if `ancestor` is `id` or lies on its parent chain.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// All function nodes in source order.
    pub fn functions(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Function { .. }))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    pub fn function_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Function { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// The function that owns `id`: the nearest boundary on its parent chain,
    /// provided that boundary is a [`NodeKind::Function`]. Lambdas,
    /// initializers and class bodies are not modelled as owners.
    pub fn owner(&self, id: NodeId) -> Result<NodeId, OwnerError> {
        for ancestor in self.ancestors(id) {
            let kind = self.kind(ancestor);
            if kind.is_function_boundary() {
                return match kind {
                    NodeKind::Function { .. } => Ok(ancestor),
                    _ => Err(OwnerError::NotFound { line: self.line(id) }),
                };
            }
        }
        Err(OwnerError::NotFound { line: self.line(id) })
    }
}

pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
