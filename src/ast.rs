use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A whole input: one or more lines separated by `;`.
///
/// Lines are evaluated in order and the program's value is the value of its
/// last line. Every line commits its bindings as soon as it succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The lines of the program, in source order.
    pub lines: Vec<Line>,
}

/// A single `;`-separated line of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Line {
    /// `name(params) = body`
    FunctionDef {
        /// Name the function is bound under.
        name:   String,
        /// Parameter names, bound immutably on every call.
        params: Vec<String>,
        /// The function body, shared with every closure built from it.
        body:   Rc<Expr>,
    },
    /// `a = b = value`
    VarDef {
        /// Every name the value is bound under, left to right.
        names: Vec<String>,
        /// The assigned expression, evaluated once.
        value: Expr,
    },
    /// A bare expression whose value is the value of the line.
    Expression(Expr),
}

/// An expression node.
///
/// Parenthesized expressions carry no node of their own: grouping is already
/// encoded in the shape of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The empty expression, e.g. `()` or an empty line. Evaluates to nothing.
    Empty,
    /// A parenthesized list of bare names, e.g. `(x, y)`.
    WordList(Vec<String>),
    /// A flat chain `operand op operand op operand ...` of one precedence
    /// tier, folded from the left.
    Infix {
        /// The `n + 1` operands of the chain.
        operands:  Vec<Self>,
        /// The `n` operators between them.
        operators: Vec<BinaryOperator>,
    },
    /// Prefix operators applied to an operand, innermost last.
    Unary {
        /// Operators in source order; they are applied right to left.
        operators: Vec<UnaryOperator>,
        /// The operand the operators apply to.
        operand:   Box<Self>,
    },
    /// Adjacent operands multiplied together, e.g. `2x(y + 1)`.
    ImplicitMult(Vec<Self>),
    /// A numeric literal.
    Number(#[serde(with = "crate::util::num::float_repr")] f64),
    /// A possibly dotted name, e.g. `x` or `physics.g`.
    Name(Vec<String>),
    /// An array literal; `[]` has no elements.
    Array(Vec<Self>),
    /// A curried call: `callee(group)(group)...`.
    Call {
        /// The expression producing the function.
        callee: Box<Self>,
        /// One argument list per pair of parentheses.
        groups: Vec<Vec<Self>>,
    },
    /// Chained subscripts: `base[i, j][k]...`.
    Index {
        /// The expression being indexed.
        base:       Box<Self>,
        /// One array literal per pair of brackets.
        subscripts: Vec<Self>,
    },
}

impl Expr {
    /// Reads the expression as a list of bare names without evaluating it.
    ///
    /// A single undotted name yields a one-element list, a parenthesized word
    /// list yields its names and the empty expression yields an empty list.
    /// Anything else is not a word list.
    ///
    /// # Example
    /// ```
    /// use combicalc::ast::Expr;
    ///
    /// let name = Expr::Name(vec!["x".to_string()]);
    /// assert_eq!(name.to_word_list(), Some(vec!["x".to_string()]));
    ///
    /// assert_eq!(Expr::Number(1.0).to_word_list(), None);
    /// ```
    #[must_use]
    pub fn to_word_list(&self) -> Option<Vec<String>> {
        match self {
            Self::Empty => Some(Vec::new()),
            Self::WordList(words) => Some(words.clone()),
            Self::Name(words) if words.len() == 1 => Some(words.clone()),
            _ => None,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators take two operands and are applied elementwise with
/// broadcasting. Comparison and logical operators produce `1` or `0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// Exponentiation (`^`)
    Pow,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`), with the sign of the divisor
    Mod,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Greater than (`>`)
    Greater,
    /// Less than (`<`)
    Less,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal to (`==` or `eq`)
    Equal,
    /// Not equal to (`!=` or `neq`)
    NotEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

impl BinaryOperator {
    /// Maps an operator token to its operator, if it is a binary operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "^" => Self::Pow,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "+" => Self::Add,
            "-" => Self::Sub,
            ">" => Self::Greater,
            "<" => Self::Less,
            ">=" => Self::GreaterEqual,
            "<=" => Self::LessEqual,
            "==" | "eq" => Self::Equal,
            "!=" | "neq" => Self::NotEqual,
            "and" => Self::And,
            "or" => Self::Or,
            _ => return None,
        };
        Some(operator)
    }
}

/// Represents a prefix unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Identity (`+x`).
    Plus,
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x` or `not x`).
    Not,
}

impl UnaryOperator {
    /// Maps an operator token to its operator, if it is a prefix operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Negate),
            "!" | "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };
        let operator = match self {
            Pow => "^",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Add => "+",
            Sub => "-",
            Greater => ">",
            Less => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Plus => "+",
            Self::Negate => "-",
            Self::Not => "!",
        };
        write!(f, "{operator}")
    }
}
