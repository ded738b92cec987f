use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr, Line, Program, UnaryOperator},
    error::ParseError,
    interpreter::parser::{
        core::ParseResult,
        tree::{Label, Node, Tree},
    },
    util::stack,
};

/// Converts a labeled `program` tree into the typed AST.
///
/// The grammar already resolved every ambiguity, so lowering is a direct
/// structural walk. Single-child `infix` and `operand` wrappers disappear,
/// and empty arguments inside call groups are dropped.
///
/// # Errors
/// Returns [`ParseError::MalformedTree`] if the tree does not have the shape
/// the grammar produces.
pub fn lower_program(tree: &Tree) -> ParseResult<Program> {
    let node = expect(tree, Label::Program)?;
    let lines = node.children.iter().map(lower_line).collect::<ParseResult<_>>()?;
    Ok(Program { lines })
}

fn lower_line(tree: &Tree) -> ParseResult<Line> {
    let node = expect(tree, Label::Line)?;
    let inner = only_child(node)?;

    match inner {
        Tree::Node(def) if def.label == Label::FunctionDef => {
            let [name, params, body] = def.children.as_slice() else {
                return Err(malformed("function definition without name, parameters and body"));
            };
            Ok(Line::FunctionDef { name:   word(name)?,
                                   params: word_list(params)?,
                                   body:   Rc::new(lower(body)?), })
        },
        Tree::Node(def) if def.label == Label::VarDef => {
            let Some((value, names)) = def.children.split_last() else {
                return Err(malformed("empty variable definition"));
            };
            Ok(Line::VarDef { names: names.iter().map(word).collect::<ParseResult<_>>()?,
                              value: lower(value)?, })
        },
        _ => Ok(Line::Expression(lower(inner)?)),
    }
}

/// Lowers any expression-level tree.
fn lower(tree: &Tree) -> ParseResult<Expr> {
    let node = match tree {
        Tree::Empty => return Ok(Expr::Empty),
        Tree::Leaf(token) => {
            return token.value
                        .map(Expr::Number)
                        .ok_or_else(|| malformed(&format!("unexpected token '{token}'")));
        },
        Tree::Node(node) => node,
    };

    stack::grow(|| match node.label {
        Label::Expression => lower(only_child(node)?),
        Label::Infix => lower_infix(node),
        Label::Operand => lower_operand(node),
        Label::ImplicitMult => {
            Ok(Expr::ImplicitMult(node.children.iter().map(lower).collect::<ParseResult<_>>()?))
        },
        Label::Name => Ok(Expr::Name(node.children.iter().map(word).collect::<ParseResult<_>>()?)),
        Label::Array => lower_array(node),
        Label::FunctionCall => lower_call(node),
        Label::Index => lower_index(node),
        Label::WordList => Ok(Expr::WordList(word_list(tree)?)),
        other => Err(malformed(&format!("'{}' is not an expression", other.as_str()))),
    })
}

fn lower_infix(node: &Node) -> ParseResult<Expr> {
    if let [single] = node.children.as_slice() {
        return lower(single);
    }
    if node.children.len() % 2 == 0 {
        return Err(malformed("infix chain with an even number of elements"));
    }

    let mut operands = Vec::with_capacity(node.children.len() / 2 + 1);
    let mut operators = Vec::with_capacity(node.children.len() / 2);

    for (i, child) in node.children.iter().enumerate() {
        if i % 2 == 0 {
            operands.push(lower(child)?);
        } else {
            let symbol = operator_symbol(child)?;
            let operator = BinaryOperator::from_symbol(&symbol).ok_or_else(|| {
                                                                   malformed(&format!("'{symbol}' is not a binary operator"))
                                                               })?;
            operators.push(operator);
        }
    }

    Ok(Expr::Infix { operands, operators })
}

fn lower_operand(node: &Node) -> ParseResult<Expr> {
    let Some((operand, prefixes)) = node.children.split_last() else {
        return Err(malformed("operand without children"));
    };

    if prefixes.is_empty() {
        return lower(operand);
    }

    let operators = prefixes.iter()
                            .map(|prefix| {
                                let symbol = operator_symbol(prefix)?;
                                UnaryOperator::from_symbol(&symbol).ok_or_else(|| {
                                    malformed(&format!("'{symbol}' is not a unary operator"))
                                })
                            })
                            .collect::<ParseResult<_>>()?;

    Ok(Expr::Unary { operators,
                     operand: Box::new(lower(operand)?) })
}

/// `[]` parses as a single empty element and becomes an array with none.
fn lower_array(node: &Node) -> ParseResult<Expr> {
    if let [only] = node.children.as_slice()
       && is_empty_expression(only)
    {
        return Ok(Expr::Array(Vec::new()));
    }
    Ok(Expr::Array(node.children.iter().map(lower).collect::<ParseResult<_>>()?))
}

fn lower_call(node: &Node) -> ParseResult<Expr> {
    let Some((callee, groups)) = node.children.split_first() else {
        return Err(malformed("function call without a callee"));
    };

    let groups = groups.iter()
                       .map(|group| {
                           let params = expect(group, Label::Params)?;
                           params.children
                                 .iter()
                                 .filter(|argument| !is_empty_expression(argument))
                                 .map(lower)
                                 .collect::<ParseResult<Vec<_>>>()
                       })
                       .collect::<ParseResult<_>>()?;

    Ok(Expr::Call { callee: Box::new(lower(callee)?),
                    groups })
}

fn lower_index(node: &Node) -> ParseResult<Expr> {
    let Some((base, subscripts)) = node.children.split_first() else {
        return Err(malformed("index without a base"));
    };

    Ok(Expr::Index { base:       Box::new(lower(base)?),
                     subscripts: subscripts.iter().map(lower).collect::<ParseResult<_>>()?, })
}

/// `true` for the empty tree and for an `expression` node wrapping it.
fn is_empty_expression(tree: &Tree) -> bool {
    match tree {
        Tree::Empty => true,
        Tree::Node(node) => {
            node.label == Label::Expression && matches!(node.children.as_slice(), [Tree::Empty])
        },
        Tree::Leaf(_) => false,
    }
}

fn word_list(tree: &Tree) -> ParseResult<Vec<String>> {
    let node = expect(tree, Label::WordList)?;
    node.children
        .iter()
        .filter(|child| !matches!(child, Tree::Empty))
        .map(word)
        .collect()
}

fn word(tree: &Tree) -> ParseResult<String> {
    match tree {
        Tree::Leaf(token) if token.is_word() => Ok(token.text.to_string()),
        other => Err(malformed(&format!("expected a word, found {other}"))),
    }
}

fn operator_symbol(tree: &Tree) -> ParseResult<String> {
    let node = expect(tree, Label::Operator)?;
    match only_child(node)? {
        Tree::Leaf(token) => Ok(token.text.to_string()),
        other => Err(malformed(&format!("expected an operator token, found {other}"))),
    }
}

fn expect(tree: &Tree, label: Label) -> ParseResult<&Node> {
    match tree {
        Tree::Node(node) if node.label == label => Ok(node),
        other => Err(malformed(&format!("expected '{}', found {other}", label.as_str()))),
    }
}

fn only_child(node: &Node) -> ParseResult<&Tree> {
    match node.children.as_slice() {
        [child] => Ok(child),
        _ => Err(malformed(&format!("'{}' should have exactly one child",
                                    node.label.as_str()))),
    }
}

fn malformed(details: &str) -> ParseError {
    ParseError::MalformedTree { details: details.to_string() }
}
