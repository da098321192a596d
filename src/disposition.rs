// disposition.rs - Content-Disposition header

use crate::utils::{find_param, token_and_params, Param};
use crate::{Fault, SipParseError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentDisposition {
    pub raw: String,
    pub disposition_type: String,
    pub params: Vec<Param>,
}

impl ContentDisposition {
    const HEADER: &'static str = "Content-Disposition";

    pub fn parse(value: &str) -> Result<ContentDisposition, SipParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SipParseError::value(Self::HEADER, Fault::Empty));
        }

        let (disposition_type, params) = token_and_params(value);
        if disposition_type.is_empty() {
            return Err(SipParseError::value(Self::HEADER, Fault::LeadingSeparator(';')));
        }

        Ok(ContentDisposition {
            raw: value.to_string(),
            disposition_type: disposition_type.to_string(),
            params,
        })
    }

    /// `optional` or `required`
    pub fn handling(&self) -> Option<&str> {
        find_param(&self.params, "handling").map(|p| p.value.as_str())
    }
}
