use crate::interpreter::{
    lexer::Token,
    parser::{
        combinator::{
            Forward, LabelMode, Parser, alternative, discard, empty, first_of, keep_longest, label,
            memoize, one_or_more, sequence, terminal, terminal_matching, zero_or_more,
        },
        tree::Label,
    },
};

/// Binary operator tiers, from the tightest binding to the loosest.
///
/// Each tier is `previous (operator previous)*`, gathered into one flat
/// `infix` node.
pub const PRECEDENCE_TIERS: [&[&str]; 7] = [&["^"],
                                            &["*", "/", "%"],
                                            &["+", "-"],
                                            &[">", "<", ">=", "<="],
                                            &["!=", "==", "eq", "neq"],
                                            &["and"],
                                            &["or"]];

thread_local! {
    static GRAMMAR: Grammar = Grammar::new();
}

/// The language grammar, assembled from combinators.
///
/// Recursive rules close over each other, so a grammar is built once per
/// thread and kept for the life of the thread; use [`Grammar::with`].
pub struct Grammar {
    program: Parser,
}

impl Grammar {
    /// Runs `f` with this thread's grammar.
    pub fn with<R>(f: impl FnOnce(&Self) -> R) -> R {
        GRAMMAR.with(f)
    }

    /// The start rule: `line (; line)*`.
    #[must_use]
    pub const fn program(&self) -> &Parser {
        &self.program
    }

    /// Builds every rule of the language.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn new() -> Self {
        use LabelMode::{Collapsed, Forced, Gathered, Plain};

        let punctuation = |text: &'static str| memoize(discard(terminal(text)));

        let number = memoize(terminal_matching(Token::is_number));
        let word = memoize(terminal_matching(Token::is_word));
        let open_paren = punctuation("(");
        let close_paren = punctuation(")");
        let period = punctuation(".");
        let comma = punctuation(",");
        let equal_sign = punctuation("=");
        let semicolon = punctuation(";");

        let unary_operand = Forward::new();
        let word_list = Forward::new();
        let index = Forward::new();

        let name = memoize(label(sequence([word.clone(),
                                           zero_or_more(sequence([period, word.clone()]))]),
                                 Label::Name,
                                 Plain));

        let unary_op = memoize(label(terminal_matching(Token::is_unary_operator),
                                     Label::Operator,
                                     Plain));

        let binary_operand = memoize(label(sequence([zero_or_more(unary_op),
                                                     unary_operand.parser()]),
                                           Label::Operand,
                                           Collapsed));

        let mut tier = binary_operand;
        for symbols in PRECEDENCE_TIERS {
            let operator = memoize(label(terminal_matching(move |token| token.is_one_of(symbols)),
                                         Label::Operator,
                                         Plain));
            tier = memoize(label(sequence([tier.clone(),
                                           zero_or_more(sequence([operator, tier]))]),
                                 Label::Infix,
                                 Collapsed));
        }

        let expression =
            memoize(label(first_of([tier,
                                    sequence([open_paren.clone(),
                                              word_list.parser(),
                                              close_paren.clone()]),
                                    empty()]),
                          Label::Expression,
                          Forced));

        let wrapped_expression = memoize(label(sequence([open_paren.clone(),
                                                         expression.clone(),
                                                         close_paren.clone()]),
                                               Label::Expression,
                                               Gathered));

        let expression_list = memoize(sequence([expression.clone(),
                                                one_or_more(sequence([comma.clone(),
                                                                      expression.clone()]))]));

        let wrapped_expression_list = memoize(sequence([open_paren.clone(),
                                                        expression_list.clone(),
                                                        close_paren.clone()]));

        let array = memoize(label(sequence([discard(terminal("[")),
                                            first_of([expression_list, expression.clone()]),
                                            discard(terminal("]"))]),
                                  Label::Array,
                                  Forced));

        let callable = memoize(alternative([index.parser(), wrapped_expression.clone(), name.clone()]));

        let callee = memoize(label(first_of([sequence([open_paren.clone(), close_paren.clone()]),
                                             wrapped_expression.clone(),
                                             wrapped_expression_list]),
                                   Label::Params,
                                   Forced));

        let function_call = memoize(label(sequence([callable, one_or_more(callee)]),
                                          Label::FunctionCall,
                                          Plain));

        let indexable = memoize(alternative([function_call.clone(),
                                             wrapped_expression.clone(),
                                             array.clone(),
                                             name.clone()]));

        let index_rule = memoize(label(sequence([indexable, one_or_more(array.clone())]),
                                       Label::Index,
                                       Plain));
        index.define(index_rule.clone());

        let composable_operand = memoize(keep_longest(label(first_of([index_rule,
                                                                      function_call,
                                                                      array,
                                                                      name,
                                                                      wrapped_expression,
                                                                      number]),
                                                            Label::Operand,
                                                            Plain)));

        let implicit_mult = memoize(label(sequence([composable_operand.clone(),
                                                    one_or_more(composable_operand.clone())]),
                                          Label::ImplicitMult,
                                          Plain));

        unary_operand.define(memoize(keep_longest(alternative([implicit_mult, composable_operand]))));

        let words = memoize(label(first_of([sequence([word.clone(),
                                                      zero_or_more(sequence([comma, word.clone()]))]),
                                            empty()]),
                                  Label::WordList,
                                  Forced));
        word_list.define(words.clone());

        let function_def = memoize(label(sequence([word.clone(),
                                                   open_paren,
                                                   words,
                                                   close_paren,
                                                   equal_sign.clone(),
                                                   expression.clone()]),
                                         Label::FunctionDef,
                                         Plain));

        let var_def = memoize(label(sequence([one_or_more(sequence([word, equal_sign])),
                                              expression.clone()]),
                                    Label::VarDef,
                                    Plain));

        let line = memoize(label(first_of([function_def, var_def, expression]), Label::Line, Plain));

        let program = memoize(label(sequence([line.clone(),
                                              zero_or_more(sequence([semicolon, line]))]),
                                    Label::Program,
                                    Plain));

        Self { program }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
