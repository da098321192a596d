// cseq.rs - CSeq and RAck headers

use crate::{Fault, SipMethod, SipParseError};
use serde::Serialize;

/// `CSeq: 314159 INVITE`. The sequence number is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CSeq {
    pub raw: String,
    pub seq: String,
    pub method: SipMethod,
}

impl CSeq {
    const HEADER: &'static str = "CSeq";

    /// Takes the value as dispatched (whitespace already normalised), so a
    /// separator at either end is reported rather than trimmed away.
    pub fn parse(value: &str) -> Result<CSeq, SipParseError> {
        if value.trim().is_empty() {
            return Err(SipParseError::value(Self::HEADER, Fault::Empty));
        }

        let sp = value
            .find(' ')
            .ok_or_else(|| SipParseError::value(Self::HEADER, Fault::MissingSeparator(' ')))?;
        if sp == 0 {
            return Err(SipParseError::value(Self::HEADER, Fault::LeadingSeparator(' ')));
        }
        if sp + 1 >= value.len() {
            return Err(SipParseError::value(Self::HEADER, Fault::TrailingSeparator(' ')));
        }

        let method = value[sp + 1..]
            .trim()
            .parse::<SipMethod>()
            .map_err(|fault| SipParseError::value(Self::HEADER, fault))?;

        Ok(CSeq {
            raw: value.to_string(),
            seq: value[..sp].to_string(),
            method,
        })
    }

    pub fn number(&self) -> Option<u32> {
        self.seq.parse().ok()
    }
}

/// `RAck: 776656 1 INVITE` (RFC 3262)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RAck {
    pub raw: String,
    pub rseq: String,
    pub cseq: String,
    pub method: SipMethod,
}

impl RAck {
    const HEADER: &'static str = "RAck";

    pub fn parse(value: &str) -> Result<RAck, SipParseError> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(SipParseError::value(
                Self::HEADER,
                Fault::PartCount {
                    expected: 3,
                    found: parts.len(),
                },
            ));
        }

        let method = parts[2]
            .parse::<SipMethod>()
            .map_err(|fault| SipParseError::value(Self::HEADER, fault))?;

        Ok(RAck {
            raw: value.trim().to_string(),
            rseq: parts[0].to_string(),
            cseq: parts[1].to_string(),
            method,
        })
    }
}
