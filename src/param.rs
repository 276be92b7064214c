// param.rs - `;name=value` parameter extraction and Digest auth bodies

use crate::{Result, SipParseError};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, space0},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a parameter value was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMode {
    Bare,
    Quoted,
}

/// One `;name=value` or `;name` token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Quoted values keep their quotes
    pub value: String,
    pub mode: ParamMode,
}

/// Extracts parameter `name` from a `;`-separated parameter string.
///
/// Returns `Ok(None)` when the parameter is absent. A quoted value is only
/// accepted when `allow_quoted` is set; it runs to the next `";` and keeps
/// both quotes, so semicolons inside the quotes survive.
///
/// ```
/// use sip_wire::{extract_parameter, ParamMode};
///
/// let param = extract_parameter(";transport=tcp;lr", "transport", false)
///     .unwrap()
///     .unwrap();
/// assert_eq!(param.value, "tcp");
/// assert_eq!(param.mode, ParamMode::Bare);
/// ```
pub fn extract_parameter(params: &str, name: &str, allow_quoted: bool) -> Result<Option<Parameter>> {
    if name.is_empty() || params.len() < name.len() {
        return Ok(None);
    }

    // delimiter-bound every token: ";a=1;b;"
    let mut normalized = String::with_capacity(params.len() + 2);
    if !params.starts_with(';') {
        normalized.push(';');
    }
    normalized.push_str(params);
    let appended = !params.ends_with(';');
    if appended {
        normalized.push(';');
    }

    if normalized.contains(&format!(";{};", name)) {
        return Ok(Some(Parameter {
            name: name.to_string(),
            value: String::new(),
            mode: ParamMode::Bare,
        }));
    }

    let needle = format!(";{}=", name);
    let Some(start) = normalized.find(&needle) else {
        return Ok(None);
    };
    let rest = &normalized[start + needle.len()..];

    let (end, mode) = if rest.starts_with('"') {
        if !allow_quoted {
            return Err(SipParseError::ParamFormat(name.to_string()));
        }
        // keep the closing quote
        (rest.find("\";").map(|pos| pos + 1), ParamMode::Quoted)
    } else {
        (rest.find(';'), ParamMode::Bare)
    };

    let value = match end {
        Some(end) => &rest[..end],
        None if appended => &rest[..rest.len() - 1],
        None => rest,
    };

    Ok(Some(Parameter {
        name: name.to_string(),
        value: value.to_string(),
        mode,
    }))
}

fn digest_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '=' && c != ',')(input)
}

fn digest_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        take_while(|c: char| c != ','),
    ))(input)
}

fn digest_param(input: &str) -> IResult<&str, (&str, &str)> {
    terminated(
        preceded(space0, separated_pair(digest_key, char('='), digest_value)),
        space0,
    )(input)
}

fn trim_digest(token: &str) -> &str {
    token.trim_matches(|c: char| c == '"' || c == ' ')
}

/// Parses a `WWW-Authenticate`/`Proxy-Authenticate` body of the form
/// `Digest k1="v1", k2=v2`.
///
/// Returns `None` when the scheme token is not exactly `Digest`. Items
/// without `=` are skipped; quoted values may contain commas.
pub fn parse_digest_auth_params(body: &str) -> Option<HashMap<String, String>> {
    let (scheme, mut rest) = body.trim_matches(' ').split_once(' ')?;
    if scheme != "Digest" {
        return None;
    }

    let mut params = HashMap::new();
    while !rest.is_empty() {
        if let Ok((remaining, (key, value))) = digest_param(rest) {
            params.insert(trim_digest(key).to_string(), trim_digest(value).to_string());
            rest = remaining;
        }
        // skip to the start of the next item
        rest = match rest.find(',') {
            Some(pos) => &rest[pos + 1..],
            None => "",
        };
    }

    Some(params)
}
