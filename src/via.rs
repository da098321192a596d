// via.rs - Via header parsing

use crate::utils::{find_param, parse_params, split_unquoted, Param};
use crate::{Fault, SipParseError};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, space0, space1},
    sequence::{delimited, tuple},
    IResult,
};
use serde::Serialize;

const HEADER: &str = "Via";

/// One Via entry: `SIP/2.0/UDP sent-by;params`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Via {
    pub raw: String,
    pub proto: String,
    pub version: String,
    pub transport: String,
    pub sent_by: String,
    pub params: Vec<Param>,
}

fn protocol_token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '/' || c.is_whitespace())(input)
}

fn slash(input: &str) -> IResult<&str, char> {
    delimited(space0, char('/'), space0)(input)
}

// sent-protocol LWS, leaving sent-by and params as the remainder
fn sent_protocol(input: &str) -> IResult<&str, (&str, &str, &str)> {
    let (input, (proto, _, version, _, transport, _)) = tuple((
        protocol_token,
        slash,
        protocol_token,
        slash,
        take_till1(|c: char| c.is_whitespace()),
        space1,
    ))(input)?;
    Ok((input, (proto, version, transport)))
}

impl Via {
    pub fn parse(value: &str) -> Result<Via, SipParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SipParseError::value(HEADER, Fault::Empty));
        }

        let (rest, (proto, version, transport)) =
            sent_protocol(value).map_err(|_| SipParseError::value(HEADER, protocol_fault(value)))?;

        let (sent_by, params) = match rest.find(';') {
            Some(semi) => (rest[..semi].trim(), parse_params(&rest[semi + 1..])),
            None => (rest.trim(), Vec::new()),
        };
        if sent_by.is_empty() {
            return Err(SipParseError::value(HEADER, Fault::LeadingSeparator(';')));
        }

        Ok(Via {
            raw: value.to_string(),
            proto: proto.to_string(),
            version: version.to_string(),
            transport: transport.to_string(),
            sent_by: sent_by.to_string(),
            params,
        })
    }

    /// A header value may carry several comma-separated Via entries
    pub fn parse_list(value: &str) -> Result<Vec<Via>, SipParseError> {
        split_unquoted(value, ',').into_iter().map(Via::parse).collect()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }

    pub fn branch(&self) -> Option<&str> {
        self.param("branch")
    }

    pub fn received(&self) -> Option<&str> {
        self.param("received")
    }

    /// `Some("")` when `rport` is present without a value
    pub fn rport(&self) -> Option<&str> {
        self.param("rport")
    }
}

fn protocol_fault(value: &str) -> Fault {
    let protocol = value.split_whitespace().next().unwrap_or_default();
    let slashes = protocol.matches('/').count();
    if slashes < 2 && !value.contains(" /") && !value.contains("/ ") {
        Fault::PartCount {
            expected: 3,
            found: slashes + 1,
        }
    } else {
        Fault::MissingSeparator(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_via() {
        let via = Via::parse("SIP/2.0/UDP 0.0.0.0:5060;branch=z9hG4bK05B1a4c756d527cb513").unwrap();
        assert_eq!(via.proto, "SIP");
        assert_eq!(via.version, "2.0");
        assert_eq!(via.transport, "UDP");
        assert_eq!(via.sent_by, "0.0.0.0:5060");
        assert_eq!(via.branch(), Some("z9hG4bK05B1a4c756d527cb513"));
    }

    #[test]
    fn test_parse_via_without_params() {
        let via = Via::parse("SIP/2.0/TCP client.atlanta.example.com:5060").unwrap();
        assert_eq!(via.transport, "TCP");
        assert_eq!(via.sent_by, "client.atlanta.example.com:5060");
        assert!(via.params.is_empty());
        assert_eq!(via.branch(), None);
    }

    #[test]
    fn test_parse_via_lws_around_slashes() {
        let via = Via::parse("SIP / 2.0 / UDP first.example.com: 4000;ttl=16").unwrap();
        assert_eq!(via.proto, "SIP");
        assert_eq!(via.version, "2.0");
        assert_eq!(via.transport, "UDP");
        assert_eq!(via.sent_by, "first.example.com: 4000");
        assert_eq!(via.param("ttl"), Some("16"));
    }

    #[test]
    fn test_via_accessors() {
        let via = Via::parse("SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776;received=192.0.2.1;rport").unwrap();
        assert_eq!(via.received(), Some("192.0.2.1"));
        assert_eq!(via.rport(), Some(""));
    }

    #[test]
    fn test_parse_list() {
        let vias = Via::parse_list(
            "SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/TCP b.example.com;branch=z9hG4bK2",
        )
        .unwrap();
        assert_eq!(vias.len(), 2);
        assert_eq!(vias[0].sent_by, "a.example.com");
        assert_eq!(vias[1].transport, "TCP");
        assert_eq!(vias[1].branch(), Some("z9hG4bK2"));
    }

    #[test]
    fn test_malformed_via() {
        assert_eq!(
            Via::parse(""),
            Err(SipParseError::value(HEADER, Fault::Empty))
        );
        assert_eq!(
            Via::parse("SIP/2.0 host.com"),
            Err(SipParseError::value(
                HEADER,
                Fault::PartCount {
                    expected: 3,
                    found: 2
                }
            ))
        );
        assert_eq!(
            Via::parse("SIP/2.0/UDP"),
            Err(SipParseError::value(HEADER, Fault::MissingSeparator(' ')))
        );
        assert_eq!(
            Via::parse("SIP/2.0/UDP ;branch=x"),
            Err(SipParseError::value(HEADER, Fault::LeadingSeparator(';')))
        );
    }
}
