use std::{
    cell::OnceCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    interpreter::{
        lexer::Token,
        parser::tree::{Label, Tree},
    },
    util::stack,
};

/// The trees one parse path produced, in source order.
pub type Forest = Vec<Tree>;

/// Every way a parser can consume input from one start offset.
///
/// Keys are the reachable end offsets; each maps to the forest that reaches
/// it. An empty map means the parser does not match.
pub type Parsed = BTreeMap<usize, Forest>;

/// Identifies a memoized rule at one token offset.
type MemoKey = (usize, usize);

static NEXT_RULE_ID: AtomicUsize = AtomicUsize::new(0);

/// Scratch state of one parse call.
///
/// Holds the token sequence, the memo table, the left-recursion counters and
/// a count of parser invocations. A fresh state is created for every input
/// and dropped with it, so nothing leaks between parses.
pub struct ParseState {
    tokens:   Vec<Token>,
    memo:     HashMap<MemoKey, Parsed>,
    counters: HashMap<MemoKey, usize>,
    steps:    usize,
}

impl ParseState {
    /// Creates an empty state for `tokens`.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens,
               memo: HashMap::new(),
               counters: HashMap::new(),
               steps: 0 }
    }

    /// The token sequence being parsed.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of parser invocations so far.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Number of memo entries recorded so far.
    #[must_use]
    pub fn memo_entries(&self) -> usize {
        self.memo.len()
    }
}

/// A parser over a token sequence.
///
/// A parser never fails by error: it reports every end offset it can reach
/// from the start offset, possibly none. Parsers are shared, cheap to clone
/// and composed with the functions of this module.
#[derive(Clone)]
pub struct Parser(Rc<dyn Fn(&mut ParseState, usize) -> Parsed>);

impl Parser {
    /// Wraps a parsing function.
    pub fn new<F>(parse: F) -> Self
        where F: Fn(&mut ParseState, usize) -> Parsed + 'static
    {
        Self(Rc::new(parse))
    }

    /// Runs the parser from token offset `pos`.
    ///
    /// Left recursion re-enters rules once per remaining token, so a long
    /// input recurses deeply; the stack grows on demand.
    pub fn parse(&self, state: &mut ParseState, pos: usize) -> Parsed {
        state.steps += 1;
        stack::grow(|| (self.0)(state, pos))
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Parser").finish_non_exhaustive()
    }
}

/// A late-bound parser, used to build recursive rules.
///
/// [`Forward::parser`] can be composed before the rule exists; the rule is
/// supplied later with [`Forward::define`]. Until then the reference matches
/// nothing.
#[derive(Clone, Default)]
pub struct Forward(Rc<OnceCell<Parser>>);

impl Forward {
    /// Creates an undefined forward reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser that delegates to whatever this reference is defined as.
    #[must_use]
    pub fn parser(&self) -> Parser {
        let cell = Rc::clone(&self.0);
        Parser::new(move |state, pos| cell.get().map_or_else(Parsed::new, |rule| rule.parse(state, pos)))
    }

    /// Supplies the rule. Only the first definition takes effect.
    pub fn define(&self, rule: Parser) {
        if self.0.set(rule).is_err() {
            tracing::warn!("forward rule defined twice; keeping the first definition");
        }
    }
}

/// How [`label`] shapes the forest it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Nest the forest as the children of one new node.
    Plain,
    /// Like `Plain`, but children already carrying the label are spliced in
    /// place of themselves.
    Gathered,
    /// Like `Gathered`, but only when every child carries the label.
    Collapsed,
    /// Like `Plain`, and an empty forest still yields a node holding the
    /// empty tree.
    Forced,
}

/// Matches one token whose text is exactly `text`.
#[must_use]
pub fn terminal(text: &'static str) -> Parser {
    terminal_matching(move |token| &*token.text == text)
}

/// Matches one token satisfying `predicate`.
///
/// The match produces a single leaf.
pub fn terminal_matching<F>(predicate: F) -> Parser
    where F: Fn(&Token) -> bool + 'static
{
    Parser::new(move |state, pos| match state.tokens.get(pos) {
        Some(token) if predicate(token) => Parsed::from([(pos + 1, vec![Tree::Leaf(token.clone())])]),
        _ => Parsed::new(),
    })
}

/// Always matches, consuming nothing and producing nothing.
#[must_use]
pub fn empty() -> Parser {
    Parser::new(|_, pos| Parsed::from([(pos, Forest::new())]))
}

/// Runs parsers one after another, from every end offset of the previous one.
///
/// Forests are concatenated in order. A path on which some parser fails is
/// dropped while the other paths survive.
pub fn sequence<I>(parsers: I) -> Parser
    where I: IntoIterator<Item = Parser>
{
    let parsers: Vec<Parser> = parsers.into_iter().collect();

    Parser::new(move |state, pos| {
        let mut output = Parsed::from([(pos, Forest::new())]);

        for parser in &parsers {
            let mut next = Parsed::new();
            for (start, prefix) in &output {
                for (end, forest) in parser.parse(state, *start) {
                    let mut combined = prefix.clone();
                    combined.extend(forest);
                    next.insert(end, combined);
                }
            }
            if next.is_empty() {
                return next;
            }
            output = next;
        }

        output
    })
}

/// Unions the results of every alternative.
///
/// Where two alternatives reach the same end offset, the later one's forest
/// is kept.
pub fn alternative<I>(parsers: I) -> Parser
    where I: IntoIterator<Item = Parser>
{
    let parsers: Vec<Parser> = parsers.into_iter().collect();

    Parser::new(move |state, pos| {
        let mut output = Parsed::new();
        for parser in &parsers {
            output.extend(parser.parse(state, pos));
        }
        output
    })
}

/// Returns the result of the first alternative that matches at all.
///
/// Later alternatives are not run once one matches.
pub fn first_of<I>(parsers: I) -> Parser
    where I: IntoIterator<Item = Parser>
{
    let parsers: Vec<Parser> = parsers.into_iter().collect();

    Parser::new(move |state, pos| {
        for parser in &parsers {
            let output = parser.parse(state, pos);
            if !output.is_empty() {
                return output;
            }
        }
        Parsed::new()
    })
}

/// Matches `parser` as many times as possible, at least once.
///
/// The repetition refers to itself, so the returned parser owns a reference
/// cycle and lives as long as the grammar holding it.
#[must_use]
pub fn one_or_more(parser: Parser) -> Parser {
    let rest = Forward::new();
    let repeated = first_of([sequence([parser.clone(), rest.parser()]), parser]);
    rest.define(repeated.clone());
    repeated
}

/// Matches `parser` as many times as possible, possibly zero times.
#[must_use]
pub fn zero_or_more(parser: Parser) -> Parser {
    let rest = Forward::new();
    let repeated = first_of([sequence([parser, rest.parser()]), empty()]);
    rest.define(repeated.clone());
    repeated
}

/// Keeps only the longest match.
#[must_use]
pub fn keep_longest(parser: Parser) -> Parser {
    Parser::new(move |state, pos| {
        let mut output = parser.parse(state, pos);
        output.pop_last().map(|longest| Parsed::from([longest])).unwrap_or_default()
    })
}

/// Keeps the end offsets of `parser` but drops its trees.
///
/// Used for punctuation that shapes the parse but carries no meaning.
#[must_use]
pub fn discard(parser: Parser) -> Parser {
    Parser::new(move |state, pos| {
        parser.parse(state, pos).into_keys().map(|end| (end, Forest::new())).collect()
    })
}

/// Wraps every forest `parser` produces in a node labeled `name`.
///
/// See [`LabelMode`] for how nested nodes with the same label are treated.
/// An empty forest stays empty unless the mode is [`LabelMode::Forced`].
#[must_use]
pub fn label(parser: Parser, name: Label, mode: LabelMode) -> Parser {
    Parser::new(move |state, pos| {
        parser.parse(state, pos)
              .into_iter()
              .map(|(end, forest)| (end, shape(forest, name, mode)))
              .collect()
    })
}

/// Applies a label and its mode to one forest.
fn shape(forest: Forest, name: Label, mode: LabelMode) -> Forest {
    if forest.is_empty() {
        return if mode == LabelMode::Forced {
            vec![Tree::node(name, vec![Tree::Empty])]
        } else {
            forest
        };
    }

    let splice = match mode {
        LabelMode::Plain | LabelMode::Forced => false,
        LabelMode::Gathered => true,
        LabelMode::Collapsed => forest.iter().all(|tree| tree.has_label(name)),
    };

    if !splice {
        return vec![Tree::node(name, forest)];
    }

    let mut children = Vec::with_capacity(forest.len());
    for tree in forest {
        match tree {
            Tree::Node(node) if node.label == name => children.extend(node.children.iter().cloned()),
            other => children.push(other),
        }
    }
    vec![Tree::node(name, children)]
}

/// Caches the results of `parser` per start offset for one parse call.
///
/// Every uncached entry at an offset bumps a counter for that offset; once it
/// exceeds the number of remaining tokens plus one, the entry matches nothing.
/// This stops left recursion while letting a left-recursive rule grow by one
/// step on each re-entry, because each completed level stores its result
/// before the level above reads it.
#[must_use]
pub fn memoize(parser: Parser) -> Parser {
    let id = NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed);

    Parser::new(move |state, pos| {
        let key = (id, pos);
        if let Some(cached) = state.memo.get(&key) {
            return cached.clone();
        }

        let remaining = state.tokens.len().saturating_sub(pos);
        let count = state.counters.entry(key).or_insert(1);
        if *count > remaining + 1 {
            return Parsed::new();
        }
        *count += 1;

        let output = parser.parse(state, pos);
        state.memo.insert(key, output.clone());
        output
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn run(parser: &Parser, source: &str) -> Parsed {
        let mut state = ParseState::new(tokenize(source).unwrap());
        parser.parse(&mut state, 0)
    }

    fn number() -> Parser {
        terminal_matching(Token::is_number)
    }

    #[test]
    fn sequence_drops_dead_paths_only() {
        let two_or_three = alternative([sequence([number(), number()]),
                                        sequence([number(), number(), number()])]);
        let parser = sequence([two_or_three, terminal(";")]);

        let output = run(&parser, "1 2 3 ;");
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(output[&4].len(), 4);
    }

    #[test]
    fn alternative_unions_and_first_of_short_circuits() {
        let one = number();
        let two = sequence([number(), number()]);

        let union = run(&alternative([one.clone(), two.clone()]), "1 2");
        assert_eq!(union.keys().copied().collect::<Vec<_>>(), vec![1, 2]);

        let greedy = run(&first_of([one, two]), "1 2");
        assert_eq!(greedy.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn keep_longest_collapses_to_the_rightmost_end() {
        let parser = keep_longest(alternative([number(), sequence([number(), number()])]));
        let output = run(&parser, "1 2");
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn repetition_is_greedy() {
        let output = run(&one_or_more(number()), "1 2 3 +");
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![3]);

        let none = run(&zero_or_more(number()), "+");
        assert_eq!(none.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert!(run(&one_or_more(number()), "+").is_empty());
    }

    #[test]
    fn forced_labels_mark_empty_matches() {
        let plain = run(&label(empty(), Label::WordList, LabelMode::Plain), "");
        assert!(plain[&0].is_empty());

        let forced = run(&label(empty(), Label::WordList, LabelMode::Forced), "");
        assert_eq!(forced[&0][0].to_string(), "(word_list ())");
    }

    #[test]
    fn gathered_and_collapsed_labels_flatten_nested_nodes() {
        let inner = label(number(), Label::Infix, LabelMode::Plain);
        let pair = sequence([inner.clone(), terminal("+"), inner.clone()]);

        let gathered = run(&label(pair.clone(), Label::Infix, LabelMode::Gathered), "1 + 2");
        assert_eq!(gathered[&3][0].to_string(), "(infix 1 + 2)");

        let collapsed = run(&label(pair, Label::Infix, LabelMode::Collapsed), "1 + 2");
        assert_eq!(collapsed[&3][0].to_string(), "(infix (infix 1) + (infix 2))");

        let single = run(&label(inner, Label::Infix, LabelMode::Collapsed), "1");
        assert_eq!(single[&1][0].to_string(), "(infix 1)");
    }

    #[test]
    fn memoized_left_recursion_grows_left_associatively() {
        let rule = Forward::new();
        let expression = memoize(label(alternative([sequence([rule.parser(),
                                                              terminal("-"),
                                                              number()]),
                                                    number()]),
                                        Label::Infix,
                                        LabelMode::Plain));
        rule.define(expression.clone());

        let output = run(&expression, "1 - 2 - 3");
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(output[&5][0].to_string(), "(infix (infix (infix 1) - 2) - 3)");
    }

    #[test]
    fn memo_is_scoped_to_one_state() {
        let parser = memoize(number());

        let mut first = ParseState::new(tokenize("1").unwrap());
        assert_eq!(parser.parse(&mut first, 0).len(), 1);
        assert_eq!(first.memo_entries(), 1);

        let mut second = ParseState::new(tokenize("x").unwrap());
        assert!(parser.parse(&mut second, 0).is_empty());
    }
}
