use chumsky::{error::SimpleReason, prelude::*};

use crate::prelude::*;

/// Glyphs accepted as the head of a principal term.
pub const HEADS: &str = "G伊い";

/// Numerals are expanded into sums of `1`, so they are kept small.
pub const MAX_NUMERAL: usize = crate::term::MAX_NATURAL;

pub trait SimpleParser<O>: Parser<char, O, Error = Error> + Clone {}
impl<O, T> SimpleParser<O> for T where T: Parser<char, O, Error = Error> + Clone {}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error(
        "unexpected {} at position {}, expected {}",
        describe(.found),
        .position,
        describe_all(.expected)
    )]
    Unexpected {
        span: Span,
        /// 1-based character position in the original input.
        position: usize,
        expected: Vec<Option<char>>,
        found: Option<char>,
    },
    #[error("{message} at position {position}")]
    Invalid {
        span: Span,
        position: usize,
        message: String,
    },
}

fn describe(c: &Option<char>) -> String {
    match c {
        Some(c) => format!("`{c}`"),
        None => "end of input".to_owned(),
    }
}

fn describe_all(cs: &[Option<char>]) -> String {
    if cs.is_empty() {
        return "something else".to_owned();
    }
    cs.iter().map(describe).collect::<Vec<_>>().join(", ")
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Empty => 0..1,
            ParseError::Unexpected { span, .. } | ParseError::Invalid { span, .. } => span.clone(),
        }
    }

    /// `locate` maps a character index of the scanned text back into the
    /// original input.
    fn from_simple(e: Error, locate: impl Fn(usize) -> usize) -> Self {
        let start = locate(e.span().start);
        let end = if e.span().end > e.span().start {
            locate(e.span().end - 1) + 1
        } else {
            start
        };
        let span = start..end.max(start + 1);
        let position = start + 1;
        match e.reason() {
            SimpleReason::Custom(message) => ParseError::Invalid {
                span,
                position,
                message: message.clone(),
            },
            SimpleReason::Unexpected | SimpleReason::Unclosed { .. } => {
                let mut expected = e.expected().cloned().collect::<Vec<_>>();
                expected.sort_unstable();
                expected.dedup();
                ParseError::Unexpected {
                    span,
                    position,
                    expected,
                    found: e.found().copied(),
                }
            }
        }
    }
}

fn term_parser() -> impl SimpleParser<Term> {
    recursive(|term: Recursive<char, Term, Error>| {
        // 0, 1, 2, ...
        let numeral = filter(|c: &char| c.is_ascii_digit())
            .repeated()
            .at_least(1)
            .collect::<String>()
            .try_map(|digits, span: Span| match digits.parse::<usize>() {
                Ok(n) if n <= MAX_NUMERAL => Ok(Term::nat(n)),
                Ok(_) => Err(Error::custom(
                    span,
                    format!("numeral `{digits}` exceeds {MAX_NUMERAL}"),
                )),
                Err(e) => Err(Error::custom(span, format!("invalid numeral `{digits}`: {e}"))),
            })
            .labelled("numeral");

        // w, W, i
        let constant = choice((
            one_of("wω").to(Principal::omega()),
            one_of("WΩ").to(Principal::lomega()),
            one_of("iI").to(Principal::iota()),
        ))
        .labelled("constant");

        // (c), (b,c), (a,b,c)
        let arguments = just('(')
            .ignore_then(term.clone())
            .then(
                just(',')
                    .ignore_then(term.clone())
                    .then(just(',').ignore_then(term.clone()).or_not())
                    .or_not(),
            )
            .then_ignore(just(')'))
            .map(|(first, rest)| match rest {
                None => Principal::new(Term::Zero, Term::Zero, first),
                Some((second, None)) => Principal::new(Term::Zero, first, second),
                Some((second, Some(third))) => Principal::new(first, second, third),
            });

        // {x}(c), x(c), {x}(b,c), x(b,c)
        let subscripted = term
            .clone()
            .delimited_by(just('{'), just('}'))
            .or(term.clone())
            .then_ignore(just('('))
            .then(term.clone())
            .then(just(',').ignore_then(term.clone()).or_not())
            .then_ignore(just(')'))
            .map(|((subscript, first), second)| match second {
                None => Principal::new(Term::Zero, subscript, first),
                Some(second) => Principal::new(subscript, first, second),
            });

        let principal = one_of(HEADS)
            .ignore_then(just('_').or_not())
            .ignore_then(arguments.or(subscripted))
            .labelled("principal term");

        let summand = numeral.or(constant.or(principal).map(Term::from));
        summand
            .clone()
            .then(just('+').ignore_then(summand).repeated())
            .foldl(|lhs, rhs| lhs.plus(&rhs))
    })
    .labelled("term")
}

/// Parses a whole input into a term. Whitespace is insignificant.
pub fn parse_term(input: &str) -> Result<Term, ParseError> {
    let (scanned, offsets): (String, Vec<usize>) = input
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| (c, i))
        .unzip();
    if scanned.is_empty() {
        return Err(ParseError::Empty);
    }
    let len = input.chars().count();
    let locate = |i: usize| offsets.get(i).copied().unwrap_or(len);
    term_parser()
        .then_ignore(end())
        .parse(scanned.as_str())
        .map_err(|es| {
            es.into_iter()
                .max_by_key(|e| e.span().start)
                .map_or(ParseError::Empty, |e| ParseError::from_simple(e, locate))
        })
}
