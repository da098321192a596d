// address.rs - Name-addr headers (From, To, Contact, Remote-Party-Id,
// P-Asserted-Identity) and route sets

use crate::uri::{Scheme, Uri};
use crate::utils::{bracket_pair, find_param, parse_params, quote_pair, split_unquoted, Param};
use crate::{Fault, SipParseError};
use serde::Serialize;
use tracing::trace;

/// The pieces shared by every name-addr style header
#[derive(Debug)]
struct NameAddrParts {
    display_name: Option<String>,
    uri: Option<Uri>,
    params: Vec<Param>,
}

// First `<` outside a quoted string. An unterminated quote is ignored.
fn find_open_bracket(value: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    if in_quotes {
        value.find('<')
    } else {
        None
    }
}

// A quoted display name wins when its quotes close before `<`; otherwise any
// text before `<` is the name.
fn display_name(value: &str) -> (Option<String>, &str) {
    let open = find_open_bracket(value);

    if let Some((first, second)) = quote_pair(value) {
        let quotes_first = match open {
            Some(open) => second < open,
            None => first == 0,
        };
        if quotes_first {
            let name = value[first + 1..second].trim();
            let name = (!name.is_empty()).then(|| name.to_string());
            return (name, &value[second + 1..]);
        }
    }

    match open {
        Some(open) if open > 0 => {
            let name = value[..open].trim();
            let name = (!name.is_empty()).then(|| name.to_string());
            (name, &value[open..])
        }
        _ => (None, value),
    }
}

fn split_name_addr(header: &'static str, value: &str) -> Result<NameAddrParts, SipParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SipParseError::value(header, Fault::Empty));
    }

    let (display_name, rest) = display_name(value);
    let rest = rest.trim();

    if let Some((open, close)) = bracket_pair(rest) {
        let uri = Uri::parse(&rest[open + 1..close])
            .map_err(|e| SipParseError::value(header, Fault::Uri(e.to_string())))?;
        return Ok(NameAddrParts {
            display_name,
            uri: Some(uri),
            params: parse_params(&rest[close + 1..]),
        });
    }
    if rest.contains('<') {
        return Err(SipParseError::value(header, Fault::MissingSeparator('>')));
    }

    // addr-spec form: parameters after the URI belong to the header
    let (addr, params) = match rest.find(';') {
        Some(semi) => (&rest[..semi], parse_params(&rest[semi + 1..])),
        None => (rest, Vec::new()),
    };
    let uri = match Scheme::strip(addr.trim()) {
        Some(_) => Some(
            Uri::parse(addr).map_err(|e| SipParseError::value(header, Fault::Uri(e.to_string())))?,
        ),
        None => None,
    };

    Ok(NameAddrParts {
        display_name,
        uri,
        params,
    })
}

/// From, To and Contact values. `uri` is `None` for the Contact wildcard
/// `*` or a value that carries no recognisable URI.
///
/// Outside `<...>` only a scheme-qualified addr-spec is taken as a URI, so
/// `bob@biloxi.com;tag=1` has no URI while `Bob <bob@biloxi.com>` gets one
/// with no scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAddr {
    pub raw: String,
    pub display_name: Option<String>,
    pub uri: Option<Uri>,
    pub params: Vec<Param>,
}

impl NameAddr {
    pub fn parse(value: &str) -> Result<NameAddr, SipParseError> {
        Self::parse_as("From", value)
    }

    pub(crate) fn parse_as(header: &'static str, value: &str) -> Result<NameAddr, SipParseError> {
        let parts = split_name_addr(header, value)?;
        Ok(NameAddr {
            raw: value.trim().to_string(),
            display_name: parts.display_name,
            uri: parts.uri,
            params: parts.params,
        })
    }

    /// Contact values may list several addresses
    pub fn parse_contacts(value: &str) -> Result<Vec<NameAddr>, SipParseError> {
        split_unquoted(value, ',')
            .into_iter()
            .map(|contact| Self::parse_as("Contact", contact))
            .collect()
    }

    /// Display name, or the empty string when there is none
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    pub fn tag(&self) -> Option<&str> {
        self.param("tag")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }

    pub fn is_wildcard(&self) -> bool {
        self.raw == "*"
    }
}

/// Remote-Party-Id (draft-ietf-sip-privacy). Unlike From, a URI is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemotePartyId {
    pub raw: String,
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: Vec<Param>,
}

impl RemotePartyId {
    const HEADER: &'static str = "Remote-Party-ID";

    pub fn parse(value: &str) -> Result<RemotePartyId, SipParseError> {
        let parts = split_name_addr(Self::HEADER, first_identity(value))?;
        Ok(RemotePartyId {
            raw: value.trim().to_string(),
            display_name: parts.display_name,
            uri: parts
                .uri
                .ok_or_else(|| SipParseError::value(Self::HEADER, Fault::MissingUri))?,
            params: parts.params,
        })
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }

    pub fn party(&self) -> Option<&str> {
        self.param("party")
    }

    pub fn screen(&self) -> Option<&str> {
        self.param("screen")
    }

    pub fn privacy(&self) -> Option<&str> {
        self.param("privacy")
    }
}

/// P-Asserted-Identity (RFC 3325). Only the first identity is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PAssertedId {
    pub raw: String,
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: Vec<Param>,
}

impl PAssertedId {
    const HEADER: &'static str = "P-Asserted-Identity";

    pub fn parse(value: &str) -> Result<PAssertedId, SipParseError> {
        let parts = split_name_addr(Self::HEADER, first_identity(value))?;
        Ok(PAssertedId {
            raw: value.trim().to_string(),
            display_name: parts.display_name,
            uri: parts
                .uri
                .ok_or_else(|| SipParseError::value(Self::HEADER, Fault::MissingUri))?,
            params: parts.params,
        })
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }
}

fn first_identity(value: &str) -> &str {
    split_unquoted(value, ',').into_iter().next().unwrap_or(value)
}

/// Route and Record-Route: the URI inside each `<...>` entry. Entries without
/// a well-formed bracket pair are skipped.
pub fn parse_route_set(header: &'static str, value: &str) -> Result<Vec<Uri>, SipParseError> {
    let entries = split_unquoted(value, ',');
    let mut uris = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some((open, close)) = bracket_pair(entry) else {
            trace!(header, entry = %entry, "skipping route entry without <...>");
            continue;
        };
        let uri = Uri::parse(&entry[open + 1..close])
            .map_err(|e| SipParseError::value(header, Fault::Uri(e.to_string())))?;
        uris.push(uri);
    }

    Ok(uris)
}
