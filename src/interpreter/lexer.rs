use std::rc::Rc;

use logos::Logos;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The four classes of token the grammar distinguishes.
///
/// Keyword operators (`and`, `or`, `eq`, `neq`, `not`) and the number
/// spellings `Inf` and `NaN` win over the word pattern because literal tokens
/// outrank the identifier regex; longer words such as `android` still lex as
/// words. Anything else that is not whitespace falls through to `Raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[logos(skip r"\s+")]
pub enum TokenKind {
    /// Numeric literals such as `3`, `3.5`, `.5`, `3.`, `Inf` or `NaN`.
    #[regex(r"[0-9]+\.[0-9]+|\.[0-9]+|[0-9]+\.|[0-9]+")]
    #[token("Inf")]
    #[token("NaN")]
    Number,
    /// Identifiers such as `x`, `sin` or `my_value2`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
    /// Arithmetic, comparison and logical operators, and `=`.
    #[token("and")]
    #[token("or")]
    #[token("neq")]
    #[token("eq")]
    #[token("not")]
    #[token(">=")]
    #[token("<=")]
    #[token("==")]
    #[token("!=")]
    #[token("^")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("+")]
    #[token("-")]
    #[token(">")]
    #[token("<")]
    #[token("!")]
    #[token("=")]
    Operator,
    /// Any other single character: brackets, commas, semicolons, periods.
    #[regex(r"[^\s]", priority = 0)]
    Raw,
}

/// A lexical token: its class, its source text and, for numbers, its value.
///
/// Tokens are immutable once produced and cheap to clone; the parser copies
/// them into leaves of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token class.
    pub kind:   TokenKind,
    /// The exact source text.
    pub text:   Rc<str>,
    /// The parsed value of a number token.
    pub value:  Option<f64>,
    /// Byte offset of the token in the source.
    pub offset: usize,
}

impl Token {
    /// Returns `true` if this token is a number.
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    /// Returns `true` if this token is a word.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Returns `true` if this token can prefix an operand (`+ - ! not`).
    #[must_use]
    pub fn is_unary_operator(&self) -> bool {
        self.kind == TokenKind::Operator && matches!(&*self.text, "+" | "-" | "!" | "not")
    }

    /// Returns `true` if the token's text is one of `texts`.
    #[must_use]
    pub fn is_one_of(&self, texts: &[&str]) -> bool {
        texts.contains(&&*self.text)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Splits source text into tokens, discarding whitespace.
///
/// # Errors
/// Returns [`ParseError::UnexpectedCharacter`] if the scanner cannot classify
/// part of the input.
///
/// # Example
/// ```
/// use combicalc::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("2x >= .5 and y").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Number,
///                 TokenKind::Word,
///                 TokenKind::Operator,
///                 TokenKind::Number,
///                 TokenKind::Operator,
///                 TokenKind::Word]);
/// assert_eq!(tokens[3].value, Some(0.5));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(kind) = lexer.next() {
        let text = lexer.slice();
        let offset = lexer.span().start;

        let Ok(kind) = kind else {
            return Err(ParseError::UnexpectedCharacter { character: text.to_string(),
                                                         offset });
        };

        let value = if kind == TokenKind::Number { Some(parse_number(text)) } else { None };

        tokens.push(Token { kind,
                            text: Rc::from(text),
                            value,
                            offset });
    }

    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

/// Parses the text of a number token.
///
/// `Inf` and `NaN` are spelled out; everything else is a decimal literal the
/// regex already validated.
fn parse_number(text: &str) -> f64 {
    match text {
        "Inf" => f64::INFINITY,
        "NaN" => f64::NAN,
        _ => text.parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).unwrap().iter().map(|t| t.text.to_string()).collect()
    }

    #[test]
    fn keywords_beat_identifiers_but_not_longer_words() {
        let tokens = tokenize("and andy not note").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();

        assert_eq!(kinds,
                   vec![TokenKind::Operator,
                        TokenKind::Word,
                        TokenKind::Operator,
                        TokenKind::Word]);
    }

    #[test]
    fn two_character_operators_are_single_tokens() {
        assert_eq!(texts("a>=b==c!=d<=e"),
                   vec!["a", ">=", "b", "==", "c", "!=", "d", "<=", "e"]);
    }

    #[test]
    fn number_spellings() {
        let values: Vec<_> = tokenize("1 2.5 .5 3. Inf").unwrap()
                                                        .iter()
                                                        .map(|t| t.value.unwrap())
                                                        .collect();
        assert_eq!(values, vec![1.0, 2.5, 0.5, 3.0, f64::INFINITY]);

        let nan = tokenize("NaN").unwrap();
        assert!(nan[0].value.unwrap().is_nan());
    }

    #[test]
    fn punctuation_is_raw_and_offsets_are_recorded() {
        let tokens = tokenize("f(x, y);  [1]").unwrap();

        assert_eq!(tokens[1].kind, TokenKind::Raw);
        assert_eq!(&*tokens[1].text, "(");
        assert_eq!(tokens[7].offset, 10);
        assert_eq!(&*tokens[7].text, "[");
    }

    #[test]
    fn digits_then_letters_split_into_number_and_word() {
        assert_eq!(texts("2pi"), vec!["2", "pi"]);
        assert_eq!(texts("x2"), vec!["x2"]);
    }
}
