//! Nom parser for the selection-set subset of GraphQL query documents.
//!
//! Supported:
//!
//! - anonymous `{ ... }` and named `query Name($v: T) { ... }` operations
//! - aliases (`victories: wins`)
//! - arguments and directives (parsed and discarded)
//! - commas and `#` comments as insignificant tokens
//!
//! Fragments are rejected with [`QueryParseError::UnsupportedFragment`].

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace1, not_line_ending},
    combinator::{cut, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, preceded, tuple},
    IResult,
};
use schema_core::{Selection, SelectionSet};

/// Error type for query parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryParseError {
    /// Query text contains no operation
    #[error("Query is empty")]
    Empty,

    /// Malformed query text
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Fragment spreads and inline fragments
    #[error("Fragments are not supported (offset {offset})")]
    UnsupportedFragment { offset: usize },

    /// Mutations and subscriptions
    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),
}

// =============================================================================
// MAIN PARSER ENTRY POINT
// =============================================================================

/// Parse query text into its top-level selection set.
///
/// ```
/// use query_parser::parse_query;
///
/// let selection = parse_query("{ teams { wins players { name } } }").unwrap();
/// assert_eq!(selection.selections[0].name, "teams");
/// ```
pub fn parse_query(query: &str) -> Result<SelectionSet, QueryParseError> {
    let (rest, _) = ignored(query).map_err(|e| to_parse_error(query, e))?;
    if rest.is_empty() {
        return Err(QueryParseError::Empty);
    }
    for keyword in ["mutation", "subscription"] {
        if rest.starts_with(keyword) {
            return Err(QueryParseError::UnsupportedOperation(keyword.to_string()));
        }
    }

    let (rest, selection_set) = document(rest).map_err(|e| to_parse_error(query, e))?;
    if !rest.is_empty() {
        if rest.starts_with("fragment") {
            return Err(QueryParseError::UnsupportedFragment {
                offset: offset_of(query, rest),
            });
        }
        return Err(QueryParseError::Syntax {
            offset: offset_of(query, rest),
            message: "unexpected trailing input (only one operation is supported)".to_string(),
        });
    }
    Ok(selection_set)
}

fn document(input: &str) -> IResult<&str, SelectionSet> {
    let (input, _) = opt(operation_header)(input)?;
    let (input, selection_set) = preceded(ignored, selection_set)(input)?;
    let (input, _) = ignored(input)?;
    Ok((input, selection_set))
}

/// `query Name($id: ID!) @dir`
fn operation_header(input: &str) -> IResult<&str, ()> {
    value(
        (),
        tuple((
            tag("query"),
            opt(preceded(ignored, name)),
            opt(preceded(ignored, balanced_parens)),
            directives,
        )),
    )(input)
}

// =============================================================================
// SELECTIONS
// =============================================================================

fn selection_set(input: &str) -> IResult<&str, SelectionSet> {
    let (mut input, _) = char('{')(input)?;
    let mut selections = Vec::new();
    loop {
        let (rest, _) = ignored(input)?;
        if let Some(rest) = rest.strip_prefix('}') {
            return Ok((rest, SelectionSet::new(selections)));
        }
        if rest.starts_with("...") {
            return Err(nom::Err::Failure(Error::new(rest, ErrorKind::Verify)));
        }
        let (rest, selection) = cut(selection)(rest)?;
        selections.push(selection);
        input = rest;
    }
}

fn selection(input: &str) -> IResult<&str, Selection> {
    let (input, first) = name(input)?;
    let (input, aliased) = opt(preceded(
        tuple((ignored, char(':'), ignored)),
        cut(name),
    ))(input)?;
    let (input, _) = opt(preceded(ignored, balanced_parens))(input)?;
    let (input, _) = directives(input)?;
    let (input, nested) = opt(preceded(ignored, selection_set))(input)?;

    let (field, alias) = match aliased {
        Some(field) => (field, Some(first.to_string())),
        None => (first, None),
    };
    Ok((
        input,
        Selection {
            name: field.to_string(),
            alias,
            selection_set: nested,
        },
    ))
}

fn directives(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(tuple((
            ignored,
            char('@'),
            cut(name),
            opt(preceded(ignored, balanced_parens)),
        ))),
    )(input)
}

// =============================================================================
// HELPER PARSERS
// =============================================================================

/// GraphQL name: `[_A-Za-z][_0-9A-Za-z]*`
fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Whitespace, commas and comments.
fn ignored(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            tag(","),
            recognize(pair(char('#'), not_line_ending)),
        ))),
    )(input)
}

/// A parenthesised group, skipped with nesting and string literals respected.
///
/// Both `"..."` strings and `"""..."""` block strings are recognised.
fn balanced_parens(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('(') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Literal {
        None,
        String,
        BlockString,
    }

    let mut depth = 0usize;
    let mut literal = Literal::None;
    let mut escaped = false;
    let mut skip = 0usize;
    for (idx, c) in input.char_indices() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let rest = &input[idx..];
        match literal {
            Literal::String => match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => literal = Literal::None,
                _ => {}
            },
            Literal::BlockString => {
                if rest.starts_with("\\\"\"\"") {
                    skip = 3;
                } else if rest.starts_with("\"\"\"") {
                    literal = Literal::None;
                    skip = 2;
                }
            }
            Literal::None => match c {
                '"' if rest.starts_with("\"\"\"") => {
                    literal = Literal::BlockString;
                    skip = 2;
                }
                '"' => literal = Literal::String,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = idx + c.len_utf8();
                        return Ok((&input[end..], &input[..end]));
                    }
                }
                _ => {}
            },
        }
    }
    Err(nom::Err::Failure(Error::new(input, ErrorKind::TakeUntil)))
}

fn offset_of(query: &str, rest: &str) -> usize {
    query.len() - rest.len()
}

fn to_parse_error(query: &str, err: nom::Err<Error<&str>>) -> QueryParseError {
    match err {
        nom::Err::Incomplete(_) => QueryParseError::Syntax {
            offset: query.len(),
            message: "unexpected end of query".to_string(),
        },
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = offset_of(query, e.input);
            if e.code == ErrorKind::Verify && e.input.starts_with("...") {
                return QueryParseError::UnsupportedFragment { offset };
            }
            let message = match e.code {
                ErrorKind::TakeUntil => "unbalanced parentheses".to_string(),
                _ if e.input.is_empty() => "unexpected end of query".to_string(),
                code => format!("unexpected input ({code:?})"),
            };
            QueryParseError::Syntax { offset, message }
        }
    }
}
