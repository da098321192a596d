// utils.rs - Token helpers shared by the header value parsers

use serde::Serialize;
use std::fmt;

/// A `name[=value]` pair. Used for URI parameters and header parameters;
/// `value` is empty when the parameter carries no `=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Split on the first `=`, trimming both sides
    pub fn parse(s: &str) -> Self {
        match s.split_once('=') {
            Some((name, value)) => Self::new(name.trim(), value.trim()),
            None => Self::new(s.trim(), ""),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}={}", self.name, self.value)
        }
    }
}

/// Parameter names are case-insensitive.
pub fn find_param<'a>(params: &'a [Param], name: &str) -> Option<&'a Param> {
    params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Parse a `;`-separated parameter list. Empty segments are skipped, so a
/// trailing `;` adds nothing.
pub fn parse_params(s: &str) -> Vec<Param> {
    split_unquoted(s, ';').into_iter().map(Param::parse).collect()
}

/// Split `token *(; param)` into the leading token and its parameters.
pub fn token_and_params(s: &str) -> (&str, Vec<Param>) {
    match s.find(';') {
        Some(semi) => (s[..semi].trim(), parse_params(&s[semi + 1..])),
        None => (s.trim(), Vec::new()),
    }
}

/// Collapse internal whitespace runs to one space and trim both ends
pub fn clean_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Positions of the first two `"` characters
pub fn quote_pair(s: &str) -> Option<(usize, usize)> {
    let first = s.find('"')?;
    let second = s[first + 1..].find('"')? + first + 1;
    Some((first, second))
}

/// Positions of the first `<` and the first `>`, only when `>` comes after `<`
pub fn bracket_pair(s: &str) -> Option<(usize, usize)> {
    let open = s.find('<')?;
    let close = s.find('>')?;
    if close < open {
        return None;
    }
    Some((open, close))
}

/// Drop a leading `<` and the first `>` that is followed by `;` or ends the text.
pub fn strip_brackets(s: &str) -> String {
    let inner = s.strip_prefix('<').unwrap_or(s);
    for (i, c) in inner.char_indices() {
        if c != '>' {
            continue;
        }
        let rest = &inner[i + 1..];
        if rest.is_empty() || rest.starts_with(';') {
            return format!("{}{}", &inner[..i], rest);
        }
    }
    inner.to_string()
}

/// Remove every `"` from the text
pub fn strip_quotes(s: &str) -> String {
    s.replace('"', "")
}

/// Split on `,` and trim each element. Comma-free input returns `None` so the
/// caller can fall back to treating the whole value as one element.
pub fn split_commas(s: &str) -> Option<Vec<String>> {
    if !s.contains(',') {
        return None;
    }
    Some(s.split(',').map(|part| part.trim().to_string()).collect())
}

/// Comma-separated token list. A value without a comma becomes a one-element
/// list; an empty value becomes an empty list.
pub fn token_list(s: &str) -> Vec<String> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    split_commas(s).unwrap_or_else(|| vec![s.to_string()])
}

/// Split on `sep` outside quoted strings and angle brackets. Elements are
/// trimmed and empty ones dropped.
pub fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => in_brackets = true,
            '>' if !in_quotes => in_brackets = false,
            c if c == sep && !in_quotes && !in_brackets => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-.!%*_+`'~".contains(c)
}

/// RFC 3261 `token`
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}
