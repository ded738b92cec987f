use crate::{
    ast::Program,
    error::ParseError,
    interpreter::{
        lexer::{Token, tokenize},
        parser::{
            combinator::{Parsed, ParseState},
            grammar::Grammar,
            lower::lower_program,
            tree::Tree,
        },
    },
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest bracket nesting the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Counters collected while parsing one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of tokens in the input.
    pub tokens:       usize,
    /// Number of parser invocations.
    pub steps:        usize,
    /// Number of memo entries recorded.
    pub memo_entries: usize,
}

/// Parses source text into a typed program.
///
/// This is the entry point for parsing. The source is tokenized, the grammar
/// runs from the first token and the resulting tree is lowered into the AST.
///
/// # Errors
/// - [`ParseError::UnexpectedCharacter`] if the source cannot be tokenized.
/// - [`ParseError::NestingTooDeep`] if brackets nest past [`MAX_NESTING`].
/// - [`ParseError::UnexpectedToken`] if no parse consumes the whole input.
///
/// # Example
/// ```
/// use combicalc::{
///     ast::{BinaryOperator, Expr, Line},
///     interpreter::parser::parse,
/// };
///
/// let program = parse("1 + 2 * 3").unwrap();
///
/// let Line::Expression(Expr::Infix { operators, .. }) = &program.lines[0] else {
///     panic!("expected an infix chain");
/// };
/// assert_eq!(operators, &vec![BinaryOperator::Add]);
///
/// assert!(parse("2 +").is_err());
/// ```
pub fn parse(source: &str) -> ParseResult<Program> {
    let tree = parse_tree(source)?;
    lower_program(&tree)
}

/// Parses source text into the labeled parse tree, without lowering it.
///
/// Used by the calculator's debug output.
///
/// # Errors
/// Same as [`parse`], minus lowering errors.
pub fn parse_tree(source: &str) -> ParseResult<Tree> {
    parse_with_stats(source).map(|(tree, _)| tree)
}

/// Parses source text and reports how much work the parse took.
///
/// # Errors
/// Same as [`parse_tree`].
pub fn parse_with_stats(source: &str) -> ParseResult<(Tree, ParseStats)> {
    let tokens = tokenize(source)?;
    check_nesting(&tokens)?;
    let mut state = ParseState::new(tokens);

    let output = Grammar::with(|grammar| grammar.program().parse(&mut state, 0));

    let stats = ParseStats { tokens:       state.tokens().len(),
                             steps:        state.steps(),
                             memo_entries: state.memo_entries(), };
    tracing::debug!(tokens = stats.tokens,
                    steps = stats.steps,
                    memo_entries = stats.memo_entries,
                    "parsed input");

    let tree = select_complete(output, state.tokens())?;
    Ok((tree, stats))
}

/// Rejects inputs whose `(` and `[` nest past [`MAX_NESTING`].
///
/// Unbalanced brackets are left for the grammar to report.
fn check_nesting(tokens: &[Token]) -> ParseResult<()> {
    let mut depth = 0_usize;
    for token in tokens {
        match &*token.text {
            "(" | "[" => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::NestingTooDeep { limit:  MAX_NESTING,
                                                            offset: token.offset, });
                }
            },
            ")" | "]" => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    Ok(())
}

/// Picks the parse that consumed every token.
///
/// The grammar disambiguates at every level, so the forest reaching the end
/// holds exactly one tree. Without such a forest, the furthest end offset
/// names the offending token.
fn select_complete(mut output: Parsed, tokens: &[Token]) -> ParseResult<Tree> {
    if let Some(forest) = output.remove(&tokens.len()) {
        return forest.into_iter()
                     .next()
                     .ok_or_else(|| ParseError::MalformedTree { details: "complete parse produced no tree".to_string() });
    }

    let furthest = output.last_key_value().map_or(0, |(end, _)| *end);

    match tokens.get(furthest) {
        Some(token) => Err(ParseError::UnexpectedToken { token:  token.text.to_string(),
                                                         index:  furthest,
                                                         offset: token.offset, }),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}
