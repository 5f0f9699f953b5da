use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map, value};
use nom::multi::separated_list1;
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

use crate::dim::{DimValue, UNKNOWN_DIM_TOKEN};
use crate::errors::ValidationError;
use crate::shape::{ShapeConstraint, TensorShape};

type R<'i, O> = IResult<&'i str, O, VerboseError<&'i str>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'i> {
    Digits(&'i str),
    Placeholder,
}

/// Parse the textual form of a shape ("2,3,?") under a constraint.
///
/// Whitespace is ignored everywhere. Blank text is the rank-0 shape, subject
/// to the rank bounds like any other.
pub fn parse_shape(
    text: &str,
    constraint: &ShapeConstraint,
) -> Result<TensorShape, ValidationError> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let format_error = || ValidationError::Format {
        text: text.to_string(),
        partial_allowed: constraint.partial_allowed(),
    };

    let tokens = if stripped.is_empty() {
        vec![]
    } else {
        let parsed = if constraint.partial_allowed() {
            all_consuming(partial_tokens).parse(stripped.as_str())
        } else {
            all_consuming(strict_tokens).parse(stripped.as_str())
        };
        match parsed {
            Ok((_, tokens)) => tokens,
            Err(e) => {
                log::trace!("Rejecting shape {text:?}: {e:?}");
                return Err(format_error());
            }
        }
    };

    constraint.check_rank(tokens.len())?;

    let dims = tokens
        .iter()
        .map(|tok| match tok {
            Token::Digits(digits) => {
                digits.parse::<u64>().map(DimValue::Known).map_err(|_| format_error())
            }
            Token::Placeholder => Ok(DimValue::Unknown),
        })
        .collect::<Result<Vec<DimValue>, ValidationError>>()?;

    constraint.check_dims(&dims)?;
    Ok(TensorShape::known(dims))
}

/// Textual form of a shape, inverse of `parse_shape`.
///
/// Rank-unknown shapes render as the empty string, just like rank-0 ones.
pub fn render_shape(shape: &TensorShape) -> String {
    match shape.dims() {
        Some(dims) => dims.iter().join(","),
        None => String::new(),
    }
}

fn digits(i: &str) -> R<'_, Token<'_>> {
    map(digit1, Token::Digits).parse(i)
}

fn placeholder(i: &str) -> R<'_, Token<'_>> {
    value(Token::Placeholder, tag(UNKNOWN_DIM_TOKEN)).parse(i)
}

fn strict_tokens(i: &str) -> R<'_, Vec<Token<'_>>> {
    separated_list1(tag(","), digits).parse(i)
}

fn partial_tokens(i: &str) -> R<'_, Vec<Token<'_>>> {
    separated_list1(tag(","), alt((digits, placeholder))).parse(i)
}
