// accept.rs - Accept header

use crate::utils::{find_param, split_unquoted, token_and_params, Param};
use crate::{Fault, SipParseError};
use serde::Serialize;

/// One `type/subtype *(; param)` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRange {
    pub media_range: String,
    pub params: Vec<Param>,
}

impl MediaRange {
    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accept {
    pub raw: String,
    pub ranges: Vec<MediaRange>,
}

impl Accept {
    const HEADER: &'static str = "Accept";

    /// An empty value is legal and accepts nothing.
    pub fn parse(value: &str) -> Result<Accept, SipParseError> {
        let ranges = split_unquoted(value, ',')
            .into_iter()
            .map(|entry| {
                let (media_range, params) = token_and_params(entry);
                if media_range.is_empty() {
                    return Err(SipParseError::value(Self::HEADER, Fault::Empty));
                }
                Ok(MediaRange {
                    media_range: media_range.to_string(),
                    params,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Accept {
            raw: value.trim().to_string(),
            ranges,
        })
    }

    pub fn accepts(&self, media_range: &str) -> bool {
        self.ranges
            .iter()
            .any(|r| r.media_range.eq_ignore_ascii_case(media_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accept() {
        let accept = Accept::parse("application/sdp;level=1, application/x-private, text/html").unwrap();
        assert_eq!(accept.ranges.len(), 3);
        assert_eq!(accept.ranges[0].media_range, "application/sdp");
        assert_eq!(accept.ranges[0].param("level"), Some("1"));
        assert!(accept.accepts("TEXT/HTML"));
        assert!(!accept.accepts("image/png"));
    }

    #[test]
    fn test_empty_accept() {
        let accept = Accept::parse("").unwrap();
        assert!(accept.ranges.is_empty());
    }

    #[test]
    fn test_accept_missing_range() {
        assert_eq!(
            Accept::parse("application/sdp, ;q=0.5"),
            Err(SipParseError::value("Accept", Fault::Empty))
        );
    }
}
