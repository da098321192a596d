// lib.rs - Tolerant SIP message parser with typed per-header sub-parsers

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod accept;
pub mod address;
pub mod auth;
pub mod codec;
pub mod config;
pub mod cseq;
pub mod disposition;
pub mod header;
pub mod message;
pub mod reason;
pub mod start_line;
pub mod uri;
pub mod utils;
pub mod via;
pub mod warning;

pub use accept::{Accept, MediaRange};
pub use address::{NameAddr, PAssertedId, RemotePartyId};
pub use auth::Authorization;
pub use config::{ErrorPolicy, Folding, ParserConfig};
pub use cseq::{CSeq, RAck};
pub use disposition::ContentDisposition;
pub use header::{Header, HeaderName};
pub use message::{CallingPartyInfo, CallingPartyPolicy, Message};
pub use reason::Reason;
pub use start_line::{RequestLine, StartLine, StatusLine};
pub use uri::{Scheme, Uri};
pub use utils::Param;
pub use via::Via;
pub use warning::Warning;

// Limits based on RFC recommendations and common attack vectors
pub const MAX_HEADER_LENGTH: usize = 8192;
pub const MAX_HEADERS: usize = 256;
pub const MAX_BODY_LENGTH: usize = 65536;
pub const MAX_VIA_HEADERS: usize = 70; // RFC 3261 recommendation
pub const MAX_METHOD_LENGTH: usize = 32;

/// What exactly was wrong with a header value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("value is empty")]
    Empty,

    #[error("no '{0}' found")]
    MissingSeparator(char),

    #[error("'{0}' at start of value")]
    LeadingSeparator(char),

    #[error("nothing follows '{0}'")]
    TrailingSeparator(char),

    #[error("expected {expected} parts, found {found}")]
    PartCount { expected: usize, found: usize },

    #[error("no URI found")]
    MissingUri,

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("not a number: {0}")]
    InvalidNumber(String),

    #[error("{0}")]
    Uri(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SipParseError {
    #[error("No header/body boundary (CRLFCRLF) found")]
    NoBodyBoundary,

    #[error("Message too large: {0} bytes (max: {1})")]
    MessageTooLarge(usize, usize),

    #[error("Too many headers: {0} (max: {1})")]
    TooManyHeaders(usize, usize),

    #[error("Too many Via headers (max: {0})")]
    TooManyVias(usize),

    #[error("Invalid UTF-8")]
    InvalidUtf8,

    #[error("Malformed header (no colon): {0}")]
    MalformedHeader(String),

    #[error("Malformed start line: {0}")]
    MalformedStartLine(String),

    #[error("Malformed URI: {0}")]
    MalformedUri(String),

    #[error("Malformed {header} header: {fault}")]
    MalformedValue { header: &'static str, fault: Fault },

    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    #[error("Missing URI in {0} header")]
    MissingUri(&'static str),
}

impl SipParseError {
    pub(crate) fn value(header: &'static str, fault: Fault) -> Self {
        SipParseError::MalformedValue { header, fault }
    }

    /// True for errors that make the whole message unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SipParseError::NoBodyBoundary
                | SipParseError::MessageTooLarge(..)
                | SipParseError::TooManyHeaders(..)
                | SipParseError::InvalidUtf8
        )
    }
}

impl Serialize for SipParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SipMethod {
    Register,
    Invite,
    Ack,
    Bye,
    Cancel,
    Options,
    Info,
    Update,
    Prack,
    Subscribe,
    Notify,
    Refer,
    Message,
    Publish,
    Other(String),
}

impl FromStr for SipMethod {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_METHOD_LENGTH || !utils::is_token(s) {
            return Err(Fault::InvalidMethod(s.to_string()));
        }

        // Methods are case-sensitive (RFC 3261 section 7.1)
        Ok(match s {
            "REGISTER" => SipMethod::Register,
            "INVITE" => SipMethod::Invite,
            "ACK" => SipMethod::Ack,
            "BYE" => SipMethod::Bye,
            "CANCEL" => SipMethod::Cancel,
            "OPTIONS" => SipMethod::Options,
            "INFO" => SipMethod::Info,
            "UPDATE" => SipMethod::Update,
            "PRACK" => SipMethod::Prack,
            "SUBSCRIBE" => SipMethod::Subscribe,
            "NOTIFY" => SipMethod::Notify,
            "REFER" => SipMethod::Refer,
            "MESSAGE" => SipMethod::Message,
            "PUBLISH" => SipMethod::Publish,
            method => SipMethod::Other(method.to_string()),
        })
    }
}

impl fmt::Display for SipMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SipMethod::Register => write!(f, "REGISTER"),
            SipMethod::Invite => write!(f, "INVITE"),
            SipMethod::Ack => write!(f, "ACK"),
            SipMethod::Bye => write!(f, "BYE"),
            SipMethod::Cancel => write!(f, "CANCEL"),
            SipMethod::Options => write!(f, "OPTIONS"),
            SipMethod::Info => write!(f, "INFO"),
            SipMethod::Update => write!(f, "UPDATE"),
            SipMethod::Prack => write!(f, "PRACK"),
            SipMethod::Subscribe => write!(f, "SUBSCRIBE"),
            SipMethod::Notify => write!(f, "NOTIFY"),
            SipMethod::Refer => write!(f, "REFER"),
            SipMethod::Message => write!(f, "MESSAGE"),
            SipMethod::Publish => write!(f, "PUBLISH"),
            SipMethod::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for SipMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a complete SIP message from raw bytes with the default configuration.
pub fn parse_message(input: &[u8]) -> Result<Message, SipParseError> {
    Message::parse_bytes(input)
}
