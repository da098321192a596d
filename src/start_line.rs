// start_line.rs - Request-Line and Status-Line parsing

use crate::uri::Uri;
use crate::{SipMethod, SipParseError};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, eof, rest},
    sequence::{delimited, separated_pair, terminated, tuple},
    IResult,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    pub method: SipMethod,
    pub uri: Uri,
    pub proto: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub proto: String,
    pub version: String,
    pub status_code: String,
    pub reason_phrase: String,
}

impl StatusLine {
    pub fn code(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StartLine {
    Request(RequestLine),
    Response(StatusLine),
}

impl StartLine {
    /// A line starting with `SIP` is a status line, anything else a request line.
    pub fn parse(line: &str) -> Result<StartLine, SipParseError> {
        if line.len() < 3 {
            return Err(SipParseError::MalformedStartLine(format!(
                "line too short: \"{}\"",
                line
            )));
        }

        if line.starts_with("SIP") {
            parse_status_line(line).map(StartLine::Response)
        } else {
            parse_request_line(line).map(StartLine::Request)
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, StartLine::Request(_))
    }

    pub fn method(&self) -> Option<&SipMethod> {
        match self {
            StartLine::Request(req) => Some(&req.method),
            StartLine::Response(_) => None,
        }
    }

    pub fn uri(&self) -> Option<&Uri> {
        match self {
            StartLine::Request(req) => Some(&req.uri),
            StartLine::Response(_) => None,
        }
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

// "SIP/2.0" -> ("SIP", "2.0")
fn protocol(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till1(|c: char| c == '/' || c.is_whitespace()), char('/'), token)(input)
}

// Method SP Request-URI SP SIP-Version
fn request_parts(input: &str) -> IResult<&str, (&str, &str, &str)> {
    delimited(
        space0,
        tuple((terminated(token, space1), terminated(token, space1), token)),
        terminated(space0, eof),
    )(input)
}

// SIP-Version SP Status-Code SP Reason-Phrase. The phrase keeps its inner spaces.
fn status_parts(input: &str) -> IResult<&str, (&str, &str, &str)> {
    tuple((terminated(token, space1), terminated(token, space1), rest))(input)
}

fn part_count(kind: &str, line: &str) -> SipParseError {
    SipParseError::MalformedStartLine(format!(
        "{} line needs 3 parts, found {}: \"{}\"",
        kind,
        line.split_whitespace().count(),
        line
    ))
}

fn parse_status_line(line: &str) -> Result<StatusLine, SipParseError> {
    let (_, (version, code, reason)) = status_parts(line).map_err(|_| part_count("status", line))?;

    let (proto, version) = split_protocol(version)?;
    Ok(StatusLine {
        proto: proto.to_string(),
        version: version.to_string(),
        status_code: code.to_string(),
        reason_phrase: reason.to_string(),
    })
}

fn parse_request_line(line: &str) -> Result<RequestLine, SipParseError> {
    let (_, (method, uri, version)) = request_parts(line).map_err(|_| part_count("request", line))?;

    let method = method
        .parse::<SipMethod>()
        .map_err(|fault| SipParseError::MalformedStartLine(fault.to_string()))?;
    let uri = Uri::parse(uri)?;
    let (proto, version) = split_protocol(version)?;

    Ok(RequestLine {
        method,
        uri,
        proto: proto.to_string(),
        version: version.to_string(),
    })
}

fn split_protocol(segment: &str) -> Result<(&str, &str), SipParseError> {
    all_consuming(protocol)(segment)
        .map(|(_, parts)| parts)
        .map_err(|_| {
            let problem = match segment.find('/') {
                None => "no '/' in",
                Some(0) => "'/' at start of",
                Some(_) => "'/' at end of",
            };
            SipParseError::MalformedStartLine(format!("{} protocol \"{}\"", problem, segment))
        })
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartLine::Request(req) => {
                write!(f, "{} {} {}/{}", req.method, req.uri, req.proto, req.version)
            }
            StartLine::Response(resp) => write!(
                f,
                "{}/{} {} {}",
                resp.proto, resp.version, resp.status_code, resp.reason_phrase
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_line() {
        let line = StartLine::parse("SIP/2.0 487 Request Cancelled").unwrap();
        match line {
            StartLine::Response(status) => {
                assert_eq!(status.proto, "SIP");
                assert_eq!(status.version, "2.0");
                assert_eq!(status.status_code, "487");
                assert_eq!(status.code(), Some(487));
                assert_eq!(status.reason_phrase, "Request Cancelled");
            }
            other => panic!("Expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_request_line() {
        let line = StartLine::parse("INVITE sip:+15554440000@0.0.0.0;user=phone SIP/2.0").unwrap();
        assert!(line.is_request());
        assert_eq!(line.method(), Some(&SipMethod::Invite));

        let uri = line.uri().unwrap();
        assert_eq!(uri.user.as_deref(), Some("+15554440000"));
        assert_eq!(uri.host, "0.0.0.0");
        assert_eq!(uri.param("user"), Some("phone"));

        match line {
            StartLine::Request(req) => {
                assert_eq!(req.proto, "SIP");
                assert_eq!(req.version, "2.0");
            }
            StartLine::Response(_) => unreachable!(),
        }
    }

    #[test]
    fn test_garbage_line() {
        assert!(matches!(
            StartLine::parse("dlskmgkfmdg ldf,l,"),
            Err(SipParseError::MalformedStartLine(_))
        ));
        assert!(StartLine::parse("").is_err());
        assert!(StartLine::parse("SI").is_err());
    }

    #[test]
    fn test_missing_version() {
        assert!(matches!(
            StartLine::parse("INVITE foo@bar.com SIP/"),
            Err(SipParseError::MalformedStartLine(_))
        ));
        assert!(matches!(
            StartLine::parse("INVITE foo@bar.com /2.0"),
            Err(SipParseError::MalformedStartLine(_))
        ));
        assert!(matches!(
            StartLine::parse("INVITE foo@bar.com SIP2.0"),
            Err(SipParseError::MalformedStartLine(_))
        ));
        assert!(matches!(
            StartLine::parse("SIP2.0 200 OK"),
            Err(SipParseError::MalformedStartLine(_))
        ));
    }

    #[test]
    fn test_response_without_reason() {
        assert!(StartLine::parse("SIP/2.0 200").is_err());

        let line = StartLine::parse("SIP/2.0 200 ").unwrap();
        match line {
            StartLine::Response(status) => assert_eq!(status.reason_phrase, ""),
            other => panic!("Expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_status_line_extra_spaces() {
        let line = StartLine::parse("SIP/2.0  200 OK").unwrap();
        match line {
            StartLine::Response(status) => {
                assert_eq!(status.status_code, "200");
                assert_eq!(status.code(), Some(200));
                assert_eq!(status.reason_phrase, "OK");
            }
            other => panic!("Expected response, got {:?}", other),
        }

        let line = StartLine::parse("SIP/2.0\t486   Busy Here").unwrap();
        match line {
            StartLine::Response(status) => {
                assert_eq!(status.status_code, "486");
                assert_eq!(status.reason_phrase, "Busy Here");
            }
            other => panic!("Expected response, got {:?}", other),
        }

        assert!(matches!(
            StartLine::parse("SIP/2.0  "),
            Err(SipParseError::MalformedStartLine(_))
        ));
    }

    #[test]
    fn test_request_line_part_count() {
        assert!(StartLine::parse("INVITE  sip:bob@biloxi.com   SIP/2.0 ").is_ok());
        assert!(matches!(
            StartLine::parse("INVITE sip:bob@biloxi.com"),
            Err(SipParseError::MalformedStartLine(_))
        ));
        assert!(matches!(
            StartLine::parse("INVITE sip:bob@biloxi.com SIP/2.0 extra"),
            Err(SipParseError::MalformedStartLine(_))
        ));
    }

    #[test]
    fn test_bad_request_uri() {
        assert!(matches!(
            StartLine::parse("INVITE sip: SIP/2.0"),
            Err(SipParseError::MalformedUri(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["OPTIONS sip:carol@chicago.com SIP/2.0", "SIP/2.0 180 Ringing"] {
            assert_eq!(StartLine::parse(text).unwrap().to_string(), text);
        }
    }
}
