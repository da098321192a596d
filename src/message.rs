// message.rs - Whole-message parsing, unfolding and calling party lookup

use crate::accept::Accept;
use crate::address::{NameAddr, PAssertedId, RemotePartyId};
use crate::auth::Authorization;
use crate::config::{ErrorPolicy, Folding, ParserConfig};
use crate::cseq::{CSeq, RAck};
use crate::disposition::ContentDisposition;
use crate::header::Header;
use crate::reason::Reason;
use crate::start_line::StartLine;
use crate::uri::{Scheme, Uri};
use crate::via::Via;
use crate::warning::Warning;
use crate::SipParseError;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

const BOUNDARY: &str = "\r\n\r\n";

/// A parsed SIP request or response.
///
/// Every recognised header has its own field. Headers without one are kept
/// in `headers` in arrival order. Header-level failures do not abort the
/// parse; they are collected in `errors` (see `ErrorPolicy`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Message {
    pub raw: String,
    pub start_line: Option<StartLine>,
    pub body: String,
    pub headers: Vec<Header>,
    pub errors: Vec<SipParseError>,

    pub accept: Option<Accept>,
    pub alert_info: Option<String>,
    pub allow: Vec<String>,
    pub allow_events: Vec<String>,
    pub authorization: Option<Authorization>,
    pub call_id: Option<String>,
    pub contact: Vec<NameAddr>,
    pub content_disposition: Option<ContentDisposition>,
    pub content_encoding: Option<String>,
    pub content_length: Option<String>,
    pub content_type: Option<String>,
    pub cseq: Option<CSeq>,
    pub from: Option<NameAddr>,
    pub max_forwards: Option<String>,
    pub organization: Option<String>,
    pub p_asserted_identity_value: Option<String>,
    pub privacy: Option<String>,
    pub proxy_authenticate: Option<Authorization>,
    pub proxy_authorization: Option<Authorization>,
    pub proxy_require: Vec<String>,
    pub rack: Option<RAck>,
    pub reason: Option<Reason>,
    pub record_route: Vec<Uri>,
    pub remote_party_id_value: Option<String>,
    pub require: Vec<String>,
    pub route: Vec<Uri>,
    pub rseq: Option<String>,
    pub server: Option<String>,
    pub subject: Option<String>,
    pub supported: Vec<String>,
    pub to: Option<NameAddr>,
    pub unsupported: Vec<String>,
    pub user_agent: Option<String>,
    pub via: Vec<Via>,
    pub warning: Option<Warning>,
    pub www_authenticate: Option<Authorization>,

    // Filled on first access from the raw values above
    #[serde(skip)]
    rpid_cache: OnceLock<Result<RemotePartyId, SipParseError>>,
    #[serde(skip)]
    paid_cache: OnceLock<Result<PAssertedId, SipParseError>>,
}

/// Which identity header `Message::calling_party` reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallingPartyPolicy {
    #[default]
    Default,
    Rpid,
    Paid,
}

impl From<&str> for CallingPartyPolicy {
    fn from(s: &str) -> Self {
        match s {
            "rpid" => CallingPartyPolicy::Rpid,
            "paid" => CallingPartyPolicy::Paid,
            _ => CallingPartyPolicy::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallingPartyInfo {
    pub name: String,
    pub number: String,
    pub anonymous: bool,
}

impl CallingPartyInfo {
    fn new(name: &str, uri: &Uri, anonymous: bool) -> Self {
        // tel URIs carry the number in the host position
        let number = match uri.scheme {
            Some(Scheme::Tel) => uri.host.clone(),
            _ => uri.user.clone().unwrap_or_default(),
        };
        Self {
            name: name.to_string(),
            number,
            anonymous: anonymous || is_anonymous_uri(uri),
        }
    }
}

fn is_anonymous_uri(uri: &Uri) -> bool {
    uri.user
        .as_deref()
        .is_some_and(|user| user.eq_ignore_ascii_case("anonymous"))
        || uri.host.eq_ignore_ascii_case("anonymous.invalid")
}

impl Message {
    pub fn parse(input: &str) -> Result<Message, SipParseError> {
        Self::parse_with(input, &ParserConfig::default())
    }

    pub fn parse_bytes(input: &[u8]) -> Result<Message, SipParseError> {
        Self::parse_bytes_with(input, &ParserConfig::default())
    }

    pub fn parse_bytes_with(input: &[u8], config: &ParserConfig) -> Result<Message, SipParseError> {
        check_size(input.len(), config)?;
        let text = std::str::from_utf8(input).map_err(|_| SipParseError::InvalidUtf8)?;
        Self::parse_with(text, config)
    }

    /// Parse a message. Only unusable input (oversized, no header/body
    /// boundary, too many headers) is an `Err`; everything else is recorded
    /// on the returned message.
    pub fn parse_with(input: &str, config: &ParserConfig) -> Result<Message, SipParseError> {
        check_size(input.len(), config)?;

        let boundary = input.find(BOUNDARY).ok_or(SipParseError::NoBodyBoundary)?;
        let head = &input[..boundary];
        let body = &input[boundary + BOUNDARY.len()..];

        let mut physical = head.split("\r\n");
        let start = physical.next().unwrap_or_default();
        let lines = unfold(physical, config.folding);
        if lines.len() > config.max_headers {
            return Err(SipParseError::TooManyHeaders(lines.len(), config.max_headers));
        }

        let mut message = Message {
            raw: input.to_string(),
            body: body.to_string(),
            ..Message::default()
        };
        let stop_at_first = config.error_policy == ErrorPolicy::StopAtFirst;

        match StartLine::parse(start) {
            Ok(line) => message.start_line = Some(line),
            Err(e) => {
                warn!(error = %e, "start line rejected");
                message.errors.push(e);
                if stop_at_first {
                    return Ok(message);
                }
            }
        }

        for line in &lines {
            if let Err(e) = message.dispatch(line, config) {
                warn!(error = %e, "header rejected");
                message.errors.push(e);
                if stop_at_first {
                    break;
                }
            }
        }

        debug!(
            headers = lines.len(),
            body_len = message.body.len(),
            errors = message.errors.len(),
            "parsed message"
        );
        Ok(message)
    }

    /// The first error recorded during the parse
    pub fn error(&self) -> Option<&SipParseError> {
        self.errors.first()
    }

    pub fn is_request(&self) -> bool {
        self.start_line.as_ref().is_some_and(StartLine::is_request)
    }

    pub fn request_uri(&self) -> Option<&Uri> {
        self.start_line.as_ref().and_then(StartLine::uri)
    }

    pub fn request_uri_param(&self, name: &str) -> Option<&str> {
        self.request_uri().and_then(|uri| uri.param(name))
    }

    pub fn has_request_uri_param(&self, name: &str) -> bool {
        self.request_uri().is_some_and(|uri| uri.has_param(name))
    }

    /// First unrecognised header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn content_length_value(&self) -> Option<usize> {
        self.content_length.as_deref()?.parse().ok()
    }

    pub fn max_forwards_value(&self) -> Option<u32> {
        self.max_forwards.as_deref()?.parse().ok()
    }

    pub fn rseq_value(&self) -> Option<u32> {
        self.rseq.as_deref()?.parse().ok()
    }

    /// Remote-Party-ID, parsed on first call. `None` when the header is
    /// absent or empty.
    pub fn remote_party_id(&self) -> Option<Result<&RemotePartyId, SipParseError>> {
        let value = self.remote_party_id_value.as_deref().filter(|v| !v.is_empty())?;
        Some(
            self.rpid_cache
                .get_or_init(|| RemotePartyId::parse(value))
                .as_ref()
                .map_err(|e| e.clone()),
        )
    }

    /// P-Asserted-Identity, parsed on first call. `None` when the header is
    /// absent or empty.
    pub fn p_asserted_identity(&self) -> Option<Result<&PAssertedId, SipParseError>> {
        let value = self
            .p_asserted_identity_value
            .as_deref()
            .filter(|v| !v.is_empty())?;
        Some(
            self.paid_cache
                .get_or_init(|| PAssertedId::parse(value))
                .as_ref()
                .map_err(|e| e.clone()),
        )
    }

    /// Who is calling, according to `policy`. Falls back to From when the
    /// header the policy names is absent.
    pub fn calling_party(&self, policy: CallingPartyPolicy) -> Result<CallingPartyInfo, SipParseError> {
        match policy {
            CallingPartyPolicy::Rpid => {
                if let Some(rpid) = self.remote_party_id() {
                    let rpid = rpid?;
                    let hidden = rpid.privacy().is_some_and(|p| {
                        ["full", "name", "uri"]
                            .iter()
                            .any(|level| p.eq_ignore_ascii_case(level))
                    });
                    return Ok(CallingPartyInfo::new(rpid.name(), &rpid.uri, hidden));
                }
            }
            CallingPartyPolicy::Paid => {
                if let Some(paid) = self.p_asserted_identity() {
                    let paid = paid?;
                    return Ok(CallingPartyInfo::new(paid.name(), &paid.uri, self.privacy_requests_id()));
                }
            }
            CallingPartyPolicy::Default => {}
        }

        let from = self.from.as_ref().ok_or(SipParseError::MissingHeader("From"))?;
        let uri = from.uri.as_ref().ok_or(SipParseError::MissingUri("From"))?;
        Ok(CallingPartyInfo::new(from.name(), uri, false))
    }

    // RFC 3325 section 9.3: `Privacy: id`
    fn privacy_requests_id(&self) -> bool {
        self.privacy.as_deref().is_some_and(|privacy| {
            privacy
                .split([';', ','])
                .any(|value| value.trim().eq_ignore_ascii_case("id"))
        })
    }
}

fn check_size(len: usize, config: &ParserConfig) -> Result<(), SipParseError> {
    if len > config.max_message_size {
        return Err(SipParseError::MessageTooLarge(len, config.max_message_size));
    }
    Ok(())
}

/// Join continuation lines onto the header they continue. Empty logical
/// lines are dropped.
fn unfold<'a>(physical: impl Iterator<Item = &'a str>, folding: Folding) -> Vec<String> {
    let mut logical: Vec<String> = Vec::new();

    for line in physical {
        let continuation = match folding {
            Folding::Rfc3261 => line
                .starts_with([' ', '\t'])
                .then(|| format!(" {}", line.trim_start_matches([' ', '\t']))),
            Folding::Legacy if line.len() >= 5 => {
                if let Some(rest) = line.strip_prefix('\t') {
                    Some(rest.to_string())
                } else {
                    line.strip_prefix("    ").map(str::to_string)
                }
            }
            Folding::Legacy => None,
        };

        match (continuation, logical.last_mut()) {
            (Some(tail), Some(last)) => {
                trace!(line, "joining folded line");
                last.push_str(&tail);
            }
            (Some(tail), None) => logical.push(tail.trim_start().to_string()),
            (None, _) => logical.push(line.to_string()),
        }
    }

    logical.retain(|line| !line.trim().is_empty());
    logical
}
