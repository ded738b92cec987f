/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The scanner found a character it cannot classify.
    #[error("Syntax error: unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter {
        /// The offending text.
        character: String,
        /// Byte offset of the character in the source.
        offset:    usize,
    },
    /// The grammar stopped before consuming the whole input.
    ///
    /// `index` is the furthest token position any complete program parse
    /// reached; `token` is the token sitting there.
    #[error("Syntax error: unexpected token '{token}' at offset {offset}")]
    UnexpectedToken {
        /// The token that could not be consumed.
        token:  String,
        /// Index of the token in the token sequence.
        index:  usize,
        /// Byte offset of the token in the source.
        offset: usize,
    },
    /// Brackets are nested deeper than the parser accepts.
    #[error("Syntax error: brackets nested deeper than {limit} levels at offset {offset}")]
    NestingTooDeep {
        /// The nesting limit.
        limit:  usize,
        /// Byte offset of the first bracket past the limit.
        offset: usize,
    },
    /// The grammar needed more input than was given.
    #[error("Syntax error: unexpected end of input")]
    UnexpectedEndOfInput,
    /// The parse tree did not have the shape the lowering pass expects.
    #[error("Malformed syntax tree: {details}")]
    MalformedTree {
        /// What was found instead.
        details: String,
    },
}
