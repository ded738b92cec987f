use std::{fmt, rc::Rc};

use crate::interpreter::lexer::Token;

/// Grammar rule names a labeled node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// `line (; line)*`
    Program,
    /// One `;`-separated line.
    Line,
    /// An expression, possibly empty or a word list.
    Expression,
    /// A flat chain of one precedence tier.
    Infix,
    /// A prefixed or bare operand.
    Operand,
    /// A unary or binary operator token.
    Operator,
    /// Adjacent operands multiplied together.
    ImplicitMult,
    /// A dotted name.
    Name,
    /// A bracketed array.
    Array,
    /// One parenthesized argument group.
    Params,
    /// A callee with one or more argument groups.
    FunctionCall,
    /// An indexable with one or more subscripts.
    Index,
    /// A list of bare names.
    WordList,
    /// `a = b = expression`
    VarDef,
    /// `f(x) = expression`
    FunctionDef,
}

impl Label {
    /// The rule name as it appears in tree dumps.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Line => "line",
            Self::Expression => "expression",
            Self::Infix => "infix",
            Self::Operand => "operand",
            Self::Operator => "operator",
            Self::ImplicitMult => "implicit_mult",
            Self::Name => "name",
            Self::Array => "array",
            Self::Params => "params",
            Self::FunctionCall => "function_call",
            Self::Index => "index",
            Self::WordList => "word_list",
            Self::VarDef => "var_def",
            Self::FunctionDef => "function_def",
        }
    }
}

/// A node of the labeled parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// The canonical empty node `()`.
    Empty,
    /// A bare token.
    Leaf(Token),
    /// A labeled node with ordered children.
    Node(Rc<Node>),
}

/// The payload of [`Tree::Node`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Grammar rule that produced the node.
    pub label:    Label,
    /// Child trees in source order.
    pub children: Vec<Tree>,
}

impl Tree {
    /// Builds a labeled node.
    #[must_use]
    pub fn node(label: Label, children: Vec<Self>) -> Self {
        Self::Node(Rc::new(Node { label, children }))
    }

    /// Returns the node's label, or `None` for leaves and the empty node.
    #[must_use]
    pub fn label(&self) -> Option<Label> {
        match self {
            Self::Node(node) => Some(node.label),
            _ => None,
        }
    }

    /// Returns `true` if this is a node carrying `label`.
    #[must_use]
    pub fn has_label(&self, label: Label) -> bool {
        self.label() == Some(label)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "()"),
            Self::Leaf(token) => write!(f, "{token}"),
            Self::Node(node) => {
                write!(f, "({}", node.label.as_str())?;
                for child in &node.children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            },
        }
    }
}
