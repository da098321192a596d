// auth.rs - Authorization, Proxy-Authorization, WWW-Authenticate and
// Proxy-Authenticate

use crate::utils::{find_param, split_unquoted, strip_quotes, Param};
use crate::{Fault, SipParseError};
use serde::Serialize;

/// A credentials or challenge value: `scheme name=value, name="value", ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorization {
    pub raw: String,
    pub scheme: String,
    pub params: Vec<Param>,
}

impl Authorization {
    pub fn parse(value: &str) -> Result<Authorization, SipParseError> {
        Self::parse_as("Authorization", value)
    }

    pub(crate) fn parse_as(header: &'static str, value: &str) -> Result<Authorization, SipParseError> {
        if value.trim().is_empty() {
            return Err(SipParseError::value(header, Fault::Empty));
        }

        let (scheme, rest) = value
            .split_once(' ')
            .ok_or_else(|| SipParseError::value(header, Fault::MissingSeparator(' ')))?;
        if rest.trim().is_empty() {
            return Err(SipParseError::value(header, Fault::TrailingSeparator(' ')));
        }

        let params = split_unquoted(rest, ',')
            .into_iter()
            .map(|pair| {
                let param = Param::parse(pair);
                Param {
                    value: strip_quotes(&param.value),
                    ..param
                }
            })
            .collect();

        Ok(Authorization {
            raw: value.trim().to_string(),
            scheme: scheme.to_string(),
            params,
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }
}
