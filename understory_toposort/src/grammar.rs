// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Textual graph grammars.
//!
//! Two bulk formats are understood:
//!
//! - **Groups**, used by [`TopoSort::add_graph`](crate::TopoSort::add_graph):
//!   a sequence of `(dependent leader leader ...)` groups separated by
//!   whitespace. A group with a single token is an isolated node.
//! - **Rules**, used by [`TopoSort::add_rules`](crate::TopoSort::add_rules):
//!   one `dependent : leader leader ...` rule per line. Blank lines and lines
//!   starting with `#` are skipped. Every token left of the `:` is a dependent
//!   of every token to its right; a line with no `:` (or nothing after it)
//!   lists isolated nodes.
//!
//! Both parsers convert the whole input before returning, so callers can
//! record the result all-or-nothing.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ParseError;

/// Conversion from a grammar token to a node value.
///
/// `&'a str` nodes borrow straight from the input text; integer nodes parse
/// the token in base 10.
pub trait ParseNode<'a>: Sized {
    /// Converts `token`, or returns `None` if it is not a valid node.
    fn parse_node(token: &'a str) -> Option<Self>;
}

impl<'a> ParseNode<'a> for &'a str {
    fn parse_node(token: &'a str) -> Option<Self> {
        Some(token)
    }
}

impl<'a> ParseNode<'a> for String {
    fn parse_node(token: &'a str) -> Option<Self> {
        Some(Self::from(token))
    }
}

macro_rules! impl_parse_node_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> ParseNode<'a> for $ty {
                fn parse_node(token: &'a str) -> Option<Self> {
                    token.parse().ok()
                }
            }
        )*
    };
}

impl_parse_node_int!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

/// One parsed dependency declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Rule<N> {
    pub(crate) dependent: N,
    pub(crate) leaders: Vec<N>,
}

/// Parses the group grammar.
pub(crate) fn parse_groups<'a, N>(text: &'a str) -> Result<Vec<Rule<N>>, ParseError>
where
    N: ParseNode<'a>,
{
    let mut rules = Vec::new();
    let mut pos = 0;
    while let Some(c) = text[pos..].chars().next() {
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }
        if c != '(' {
            return Err(ParseError::UnexpectedChar {
                found: c,
                offset: pos,
            });
        }

        let open = pos;
        let body_start = open + 1;
        let rest = &text[body_start..];
        let end = rest
            .find(['(', ')'])
            .ok_or(ParseError::UnterminatedGroup { offset: open })?;
        if rest.as_bytes()[end] == b'(' {
            return Err(ParseError::NestedGroup {
                offset: body_start + end,
            });
        }

        let mut toks = tokens(&rest[..end], body_start);
        let (offset, first) = toks.next().ok_or(ParseError::EmptyGroup { offset: open })?;
        let dependent = parse_token(first, offset)?;
        let leaders = toks
            .map(|(offset, tok)| parse_token(tok, offset))
            .collect::<Result<Vec<N>, _>>()?;
        rules.push(Rule { dependent, leaders });

        pos = body_start + end + 1;
    }
    Ok(rules)
}

/// Parses the line-oriented rule grammar.
pub(crate) fn parse_rules<'a, N>(text: &'a str) -> Result<Vec<Rule<N>>, ParseError>
where
    N: ParseNode<'a> + Clone,
{
    let mut rules = Vec::new();
    let mut line_start = 0;
    for (index, raw) in text.split('\n').enumerate() {
        let base = line_start;
        line_start += raw.len() + 1;

        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (lhs, rhs, rhs_base) = match raw.split_once(':') {
            Some((lhs, rhs)) => (lhs, rhs, base + lhs.len() + 1),
            None => (raw, "", base + raw.len()),
        };

        let leaders = tokens(rhs, rhs_base)
            .map(|(offset, tok)| parse_token(tok, offset))
            .collect::<Result<Vec<N>, _>>()?;

        let mut dependents = tokens(lhs, base).peekable();
        if dependents.peek().is_none() {
            return Err(ParseError::MissingDependent { line: index + 1 });
        }
        for (offset, tok) in dependents {
            rules.push(Rule {
                dependent: parse_token(tok, offset)?,
                leaders: leaders.clone(),
            });
        }
    }
    Ok(rules)
}

fn parse_token<'a, N>(token: &'a str, offset: usize) -> Result<N, ParseError>
where
    N: ParseNode<'a>,
{
    N::parse_node(token).ok_or_else(|| ParseError::InvalidToken {
        token: String::from(token),
        offset,
    })
}

/// Splits `text` on whitespace, yielding each token with its byte offset
/// (relative to `base`).
fn tokens(text: &str, base: usize) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = text;
    let mut pos = base;
    core::iter::from_fn(move || {
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            return None;
        }
        let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, tail) = trimmed.split_at(len);
        let at = pos;
        pos += len;
        rest = tail;
        Some((at, token))
    })
}
