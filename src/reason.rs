// reason.rs - Reason header (RFC 3326)

use crate::utils::{find_param, token_and_params, Param};
use crate::{Fault, SipParseError};
use serde::Serialize;

/// `Reason: Q.850;cause=16;text="Terminated"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reason {
    pub raw: String,
    pub protocol: String,
    pub params: Vec<Param>,
}

impl Reason {
    const HEADER: &'static str = "Reason";

    pub fn parse(value: &str) -> Result<Reason, SipParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SipParseError::value(Self::HEADER, Fault::Empty));
        }

        let (protocol, params) = token_and_params(value);
        if protocol.is_empty() {
            return Err(SipParseError::value(Self::HEADER, Fault::LeadingSeparator(';')));
        }

        Ok(Reason {
            raw: value.to_string(),
            protocol: protocol.to_string(),
            params,
        })
    }

    pub fn cause(&self) -> Option<&str> {
        find_param(&self.params, "cause").map(|p| p.value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        find_param(&self.params, "text").map(|p| p.value.trim_matches('"'))
    }
}
