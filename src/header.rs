// header.rs - Header names, compact forms and dispatch into Message fields

use crate::accept::Accept;
use crate::address::{parse_route_set, NameAddr};
use crate::auth::Authorization;
use crate::config::ParserConfig;
use crate::cseq::{CSeq, RAck};
use crate::disposition::ContentDisposition;
use crate::message::Message;
use crate::reason::Reason;
use crate::utils::{clean_ws, token_list};
use crate::via::Via;
use crate::warning::Warning;
use crate::SipParseError;
use ahash::RandomState;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A header with no dedicated field on `Message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Every header with a dedicated field on `Message`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderName {
    Accept,
    AlertInfo,
    Allow,
    AllowEvents,
    Authorization,
    CallId,
    Contact,
    ContentDisposition,
    ContentEncoding,
    ContentLength,
    ContentType,
    CSeq,
    From,
    MaxForwards,
    Organization,
    PAssertedIdentity,
    Privacy,
    ProxyAuthenticate,
    ProxyAuthorization,
    ProxyRequire,
    RAck,
    Reason,
    RecordRoute,
    RemotePartyId,
    Require,
    Route,
    RSeq,
    Server,
    Subject,
    Supported,
    To,
    Unsupported,
    UserAgent,
    Via,
    Warning,
    WwwAuthenticate,
}

impl HeaderName {
    pub const ALL: [HeaderName; 36] = [
        HeaderName::Accept,
        HeaderName::AlertInfo,
        HeaderName::Allow,
        HeaderName::AllowEvents,
        HeaderName::Authorization,
        HeaderName::CallId,
        HeaderName::Contact,
        HeaderName::ContentDisposition,
        HeaderName::ContentEncoding,
        HeaderName::ContentLength,
        HeaderName::ContentType,
        HeaderName::CSeq,
        HeaderName::From,
        HeaderName::MaxForwards,
        HeaderName::Organization,
        HeaderName::PAssertedIdentity,
        HeaderName::Privacy,
        HeaderName::ProxyAuthenticate,
        HeaderName::ProxyAuthorization,
        HeaderName::ProxyRequire,
        HeaderName::RAck,
        HeaderName::Reason,
        HeaderName::RecordRoute,
        HeaderName::RemotePartyId,
        HeaderName::Require,
        HeaderName::Route,
        HeaderName::RSeq,
        HeaderName::Server,
        HeaderName::Subject,
        HeaderName::Supported,
        HeaderName::To,
        HeaderName::Unsupported,
        HeaderName::UserAgent,
        HeaderName::Via,
        HeaderName::Warning,
        HeaderName::WwwAuthenticate,
    ];

    /// Canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::Accept => "Accept",
            HeaderName::AlertInfo => "Alert-Info",
            HeaderName::Allow => "Allow",
            HeaderName::AllowEvents => "Allow-Events",
            HeaderName::Authorization => "Authorization",
            HeaderName::CallId => "Call-ID",
            HeaderName::Contact => "Contact",
            HeaderName::ContentDisposition => "Content-Disposition",
            HeaderName::ContentEncoding => "Content-Encoding",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::ContentType => "Content-Type",
            HeaderName::CSeq => "CSeq",
            HeaderName::From => "From",
            HeaderName::MaxForwards => "Max-Forwards",
            HeaderName::Organization => "Organization",
            HeaderName::PAssertedIdentity => "P-Asserted-Identity",
            HeaderName::Privacy => "Privacy",
            HeaderName::ProxyAuthenticate => "Proxy-Authenticate",
            HeaderName::ProxyAuthorization => "Proxy-Authorization",
            HeaderName::ProxyRequire => "Proxy-Require",
            HeaderName::RAck => "RAck",
            HeaderName::Reason => "Reason",
            HeaderName::RecordRoute => "Record-Route",
            HeaderName::RemotePartyId => "Remote-Party-ID",
            HeaderName::Require => "Require",
            HeaderName::Route => "Route",
            HeaderName::RSeq => "RSeq",
            HeaderName::Server => "Server",
            HeaderName::Subject => "Subject",
            HeaderName::Supported => "Supported",
            HeaderName::To => "To",
            HeaderName::Unsupported => "Unsupported",
            HeaderName::UserAgent => "User-Agent",
            HeaderName::Via => "Via",
            HeaderName::Warning => "Warning",
            HeaderName::WwwAuthenticate => "WWW-Authenticate",
        }
    }

    /// RFC 3261 section 7.3.3 compact form (plus RFC 6665 `u`)
    pub fn compact(&self) -> Option<&'static str> {
        match self {
            HeaderName::CallId => Some("i"),
            HeaderName::Contact => Some("m"),
            HeaderName::ContentEncoding => Some("e"),
            HeaderName::ContentLength => Some("l"),
            HeaderName::ContentType => Some("c"),
            HeaderName::From => Some("f"),
            HeaderName::Subject => Some("s"),
            HeaderName::Supported => Some("k"),
            HeaderName::To => Some("t"),
            HeaderName::Via => Some("v"),
            HeaderName::AllowEvents => Some("u"),
            _ => None,
        }
    }

    /// Resolve a header name in any case, long or compact.
    pub fn lookup(name: &str) -> Option<HeaderName> {
        ROUTING_TABLE.get(name.to_ascii_lowercase().as_str()).copied()
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    // Keys are lower-case long names and compact forms
    static ref ROUTING_TABLE: HashMap<String, HeaderName, RandomState> = {
        let mut table = HashMap::with_hasher(RandomState::new());
        for name in HeaderName::ALL {
            table.insert(name.as_str().to_ascii_lowercase(), name);
            if let Some(compact) = name.compact() {
                table.insert(compact.to_string(), name);
            }
        }
        table
    };
}

/// Split a logical header line on its first colon. The name comes back
/// trimmed and lower-cased, the value whitespace-normalised.
pub fn split_header_line(line: &str) -> Result<(String, String), SipParseError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| SipParseError::MalformedHeader(line.to_string()))?;
    Ok((name.trim().to_ascii_lowercase(), clean_ws(value)))
}

impl Message {
    /// Route one logical header line into its field. Unknown names land in
    /// `headers`.
    pub(crate) fn dispatch(&mut self, line: &str, config: &ParserConfig) -> Result<(), SipParseError> {
        let (name, value) = split_header_line(line)?;

        let Some(header) = HeaderName::lookup(&name) else {
            debug!(header = %name, "unrecognised header");
            self.headers.push(Header { name, value });
            return Ok(());
        };
        debug!(%header, "dispatching header");

        match header {
            HeaderName::Accept => self.accept = Some(Accept::parse(&value)?),
            HeaderName::AlertInfo => self.alert_info = Some(value),
            HeaderName::Allow => self.allow.extend(token_list(&value)),
            HeaderName::AllowEvents => self.allow_events.extend(token_list(&value)),
            HeaderName::Authorization => {
                self.authorization = Some(Authorization::parse_as(header.as_str(), &value)?)
            }
            HeaderName::CallId => self.call_id = Some(value),
            HeaderName::Contact => self.contact.extend(NameAddr::parse_contacts(&value)?),
            HeaderName::ContentDisposition => {
                self.content_disposition = Some(ContentDisposition::parse(&value)?)
            }
            HeaderName::ContentEncoding => self.content_encoding = Some(value),
            HeaderName::ContentLength => self.content_length = Some(value),
            HeaderName::ContentType => self.content_type = Some(value),
            HeaderName::CSeq => self.cseq = Some(CSeq::parse(&value)?),
            HeaderName::From => self.from = Some(NameAddr::parse_as(header.as_str(), &value)?),
            HeaderName::MaxForwards => self.max_forwards = Some(value),
            HeaderName::Organization => self.organization = Some(value),
            HeaderName::PAssertedIdentity => self.p_asserted_identity_value = Some(value),
            HeaderName::Privacy => self.privacy = Some(value),
            HeaderName::ProxyAuthenticate => {
                self.proxy_authenticate = Some(Authorization::parse_as(header.as_str(), &value)?)
            }
            HeaderName::ProxyAuthorization => {
                self.proxy_authorization = Some(Authorization::parse_as(header.as_str(), &value)?)
            }
            HeaderName::ProxyRequire => self.proxy_require.extend(token_list(&value)),
            HeaderName::RAck => self.rack = Some(RAck::parse(&value)?),
            HeaderName::Reason => self.reason = Some(Reason::parse(&value)?),
            HeaderName::RecordRoute => self
                .record_route
                .extend(parse_route_set(header.as_str(), &value)?),
            HeaderName::RemotePartyId => self.remote_party_id_value = Some(value),
            HeaderName::Require => self.require.extend(token_list(&value)),
            HeaderName::Route => self.route.extend(parse_route_set(header.as_str(), &value)?),
            HeaderName::RSeq => self.rseq = Some(value),
            HeaderName::Server => self.server = Some(value),
            HeaderName::Subject => self.subject = Some(value),
            HeaderName::Supported => self.supported.extend(token_list(&value)),
            HeaderName::To => self.to = Some(NameAddr::parse_as(header.as_str(), &value)?),
            HeaderName::Unsupported => self.unsupported.extend(token_list(&value)),
            HeaderName::UserAgent => self.user_agent = Some(value),
            HeaderName::Via => {
                let vias = Via::parse_list(&value)?;
                if self.via.len() + vias.len() > config.max_via_headers {
                    return Err(SipParseError::TooManyVias(config.max_via_headers));
                }
                self.via.extend(vias);
            }
            HeaderName::Warning => self.warning = Some(Warning::parse(&value)?),
            HeaderName::WwwAuthenticate => {
                self.www_authenticate = Some(Authorization::parse_as(header.as_str(), &value)?)
            }
        }

        Ok(())
    }
}
