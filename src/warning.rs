// warning.rs - Warning header (RFC 3261 section 20.43)

use crate::utils::strip_quotes;
use crate::{Fault, SipParseError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub raw: String,
    pub code: String,
    pub agent: String,
    pub text: String,
}

impl Warning {
    const HEADER: &'static str = "Warning";

    /// `warn-code SP warn-agent SP warn-text`; the text keeps its spaces
    pub fn parse(value: &str) -> Result<Warning, SipParseError> {
        let value = value.trim();
        let parts: Vec<&str> = value.splitn(3, ' ').collect();
        if parts.len() != 3 {
            return Err(SipParseError::value(
                Self::HEADER,
                Fault::PartCount {
                    expected: 3,
                    found: parts.len(),
                },
            ));
        }

        Ok(Warning {
            raw: value.to_string(),
            code: parts[0].to_string(),
            agent: parts[1].to_string(),
            text: strip_quotes(parts[2]),
        })
    }

    pub fn code_value(&self) -> Option<u16> {
        self.code.parse().ok()
    }
}
