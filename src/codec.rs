// codec.rs - Tokio codec for SIP message framing on stream transports

use crate::config::ParserConfig;
use crate::header::{split_header_line, HeaderName};
use crate::message::Message;
use crate::{Fault, SipParseError, MAX_BODY_LENGTH, MAX_HEADER_LENGTH};
use bytes::{Buf, BytesMut};
use std::io;
use thiserror::Error;
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] SipParseError),
}

/// Frames SIP messages using the header boundary and Content-Length, then
/// hands each complete frame to `Message::parse_bytes_with`.
pub struct SipCodec {
    config: ParserConfig,
    state: CodecState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodecState {
    Headers,
    Body {
        headers_end: usize,
        content_length: usize,
    },
}

impl Default for SipCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SipCodec {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            state: CodecState::Headers,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Offset just past the blank line ending the header block
    fn find_headers_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|pos| pos + 4)
    }

    /// Content-Length (or `l`) from the header block; absent means no body
    fn extract_content_length(headers: &[u8]) -> Result<usize, SipParseError> {
        let headers = std::str::from_utf8(headers).map_err(|_| SipParseError::InvalidUtf8)?;

        for line in headers.split("\r\n").skip(1) {
            let Ok((name, value)) = split_header_line(line) else {
                continue;
            };
            if HeaderName::lookup(&name) != Some(HeaderName::ContentLength) {
                continue;
            }

            let len = value.parse::<usize>().map_err(|_| {
                SipParseError::value(HeaderName::ContentLength.as_str(), Fault::InvalidNumber(value.clone()))
            })?;
            if len > MAX_BODY_LENGTH {
                return Err(SipParseError::MessageTooLarge(len, MAX_BODY_LENGTH));
            }
            return Ok(len);
        }

        Ok(0)
    }

    fn frame(&mut self, buf: &mut BytesMut, len: usize) -> Result<Message, CodecError> {
        let frame = buf.split_to(len);
        self.state = CodecState::Headers;

        Message::parse_bytes_with(&frame, &self.config).map_err(|e| {
            warn!(error = %e, "failed to parse SIP frame");
            CodecError::Parse(e)
        })
    }
}

impl Decoder for SipCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                CodecState::Headers => {
                    // CRLF keep-alives between messages (RFC 5626 section 3.5.1)
                    while buf.starts_with(b"\r\n") {
                        trace!("skipping keep-alive CRLF");
                        buf.advance(2);
                    }

                    let Some(headers_end) = Self::find_headers_end(buf) else {
                        if buf.len() > MAX_HEADER_LENGTH {
                            return Err(SipParseError::MessageTooLarge(buf.len(), MAX_HEADER_LENGTH).into());
                        }
                        return Ok(None);
                    };
                    if headers_end > MAX_HEADER_LENGTH {
                        return Err(SipParseError::MessageTooLarge(headers_end, MAX_HEADER_LENGTH).into());
                    }

                    let content_length = match Self::extract_content_length(&buf[..headers_end]) {
                        Ok(len) => len,
                        Err(e) => {
                            // Drop the unusable header block so the stream can resync
                            buf.advance(headers_end);
                            return Err(e.into());
                        }
                    };

                    let total = headers_end + content_length;
                    if total > self.config.max_message_size {
                        buf.advance(headers_end);
                        return Err(SipParseError::MessageTooLarge(total, self.config.max_message_size).into());
                    }

                    self.state = CodecState::Body {
                        headers_end,
                        content_length,
                    };
                }

                CodecState::Body {
                    headers_end,
                    content_length,
                } => {
                    let total = headers_end + content_length;
                    if buf.len() < total {
                        buf.reserve(total - buf.len());
                        return Ok(None);
                    }

                    let message = self.frame(buf, total)?;
                    debug!(body_len = content_length, "decoded SIP message");
                    return Ok(Some(message));
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(message) => Ok(Some(message)),
            None if buf.is_empty() => Ok(None),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "incomplete SIP message at EOF").into()),
        }
    }
}
