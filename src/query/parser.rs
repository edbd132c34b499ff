//! Query Parser
//!
//! Parses query strings into a [`QueryDescriptor`], used by the CLI
//! front end.
//!
//! # Supported Syntax
//!
//! ```text
//! agent <name> [from <date> to <date>]
//! period from <date> to <date> [agent <name>]
//! ```
//!
//! # Examples
//!
//! ```text
//! agent "Ana Silva"
//! agent ana from 2024-01-01 to 2024-01-31
//! period from 2024-01-01 to 2024-01-31
//! period from 2024-01-01 to 2024-01-31 agent ana
//! ```

use chrono::NaiveDate;
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{map_res, opt},
    sequence::delimited,
    IResult,
};

use super::descriptor::QueryDescriptor;
use super::error::{EngineError, EngineResult};

/// Parse a query string into a descriptor
pub fn parse_query(input: &str) -> EngineResult<QueryDescriptor> {
    let trimmed = input.trim();

    match parse_descriptor(trimmed) {
        Ok((remaining, descriptor)) if remaining.trim().is_empty() => Ok(descriptor),
        Ok((remaining, _)) => Err(EngineError::Parse(format!(
            "unexpected input after query: '{}'",
            remaining.trim()
        ))),
        Err(e) => Err(EngineError::Parse(format!("{e:?}"))),
    }
}

fn parse_descriptor(input: &str) -> IResult<&str, QueryDescriptor> {
    alt((parse_period_query, parse_agent_query))(input)
}

fn parse_agent_query(input: &str) -> IResult<&str, QueryDescriptor> {
    let (input, _) = tag_no_case("agent")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, name) = parse_name(input)?;
    let (input, range) = opt(parse_range)(input)?;

    Ok((
        input,
        match range {
            Some((start, end)) => QueryDescriptor::agent_in_range(&name, start, end),
            None => QueryDescriptor::agent(&name),
        },
    ))
}

fn parse_period_query(input: &str) -> IResult<&str, QueryDescriptor> {
    let (input, _) = tag_no_case("period")(input)?;
    let (input, (start, end)) = parse_range(input)?;
    let (input, agent) = opt(parse_agent_filter)(input)?;

    Ok((
        input,
        match agent {
            Some(name) => QueryDescriptor::period_for_agent(start, end, &name),
            None => QueryDescriptor::period(start, end),
        },
    ))
}

fn parse_agent_filter(input: &str) -> IResult<&str, String> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("agent")(input)?;
    let (input, _) = multispace1(input)?;
    parse_name(input)
}

fn parse_range(input: &str) -> IResult<&str, (NaiveDate, NaiveDate)> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("from")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, start) = parse_date(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("to")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, end) = parse_date(input)?;
    Ok((input, (start, end)))
}

fn parse_date(input: &str) -> IResult<&str, NaiveDate> {
    map_res(
        take_while1(|c: char| c.is_ascii_digit() || c == '-'),
        |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d"),
    )(input)
}

fn parse_name(input: &str) -> IResult<&str, String> {
    alt((parse_quoted_name, parse_bare_name))(input)
}

fn parse_quoted_name(input: &str) -> IResult<&str, String> {
    let (input, name) = delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)?;
    Ok((input, name.to_string()))
}

fn parse_bare_name(input: &str) -> IResult<&str, String> {
    let (input, name) =
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.')(input)?;
    Ok((input, name.to_string()))
}
