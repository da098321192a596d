// uri.rs - SIP, SIPS and TEL URI parsing

use crate::utils::{clean_ws, find_param, parse_params, Param};
use crate::SipParseError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Sip,
    Sips,
    Tel,
}

// `sips:` must be tried before `sip:`
const SCHEME_PREFIXES: [(&str, Scheme); 3] = [
    ("sips:", Scheme::Sips),
    ("sip:", Scheme::Sip),
    ("tel:", Scheme::Tel),
];

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
        }
    }

    /// Strip a recognised scheme prefix (ASCII case-insensitive).
    pub(crate) fn strip(input: &str) -> Option<(Scheme, &str)> {
        SCHEME_PREFIXES.iter().find_map(|(prefix, scheme)| {
            let head = input.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| (*scheme, &input[prefix.len()..]))
        })
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `scheme:[user[:password]@]host[:port][;params]` URI.
///
/// `user` is `None` exactly when the text had no `@`. The port is kept as
/// text and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uri {
    pub raw: String,
    pub scheme: Option<Scheme>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub port: Option<String>,
    pub params: Vec<Param>,
    pub secure: bool,
}

impl Uri {
    pub fn parse(input: &str) -> Result<Uri, SipParseError> {
        let raw = input.trim();
        let (scheme, rest) = match Scheme::strip(raw) {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, raw),
        };

        let mut uri = Uri {
            raw: raw.to_string(),
            scheme,
            user: None,
            password: None,
            host: String::new(),
            port: None,
            params: Vec::new(),
            secure: scheme == Some(Scheme::Sips),
        };

        let host_part = match rest.find('@') {
            Some(at) => {
                uri.parse_userinfo(&rest[..at]);
                &rest[at + 1..]
            }
            None => rest,
        };
        uri.parse_hostinfo(host_part)?;

        Ok(uri)
    }

    // user[:password][;params], everything before the `@`
    fn parse_userinfo(&mut self, userinfo: &str) {
        let credentials = match userinfo.find(';') {
            Some(semi) => {
                self.params.extend(parse_params(&userinfo[semi + 1..]));
                &userinfo[..semi]
            }
            None => userinfo,
        };

        match credentials.split_once(':') {
            Some((user, password)) => {
                self.user = Some(user.to_string());
                if !password.is_empty() {
                    self.password = Some(password.to_string());
                }
            }
            None => self.user = Some(credentials.to_string()),
        }
    }

    // host[:port][;params], everything after the `@`
    fn parse_hostinfo(&mut self, hostinfo: &str) -> Result<(), SipParseError> {
        let hostport = match hostinfo.find(';') {
            Some(semi) => {
                self.params.extend(parse_params(&hostinfo[semi + 1..]));
                &hostinfo[..semi]
            }
            None => hostinfo,
        };

        let (host, port) = split_host_port(hostport);
        let host = host.trim();
        if host.is_empty() {
            return Err(SipParseError::MalformedUri(format!(
                "no host in \"{}\"",
                self.raw
            )));
        }

        self.host = host.to_string();
        self.port = port.map(clean_ws).filter(|p| !p.is_empty());
        Ok(())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name).map(|p| p.value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        find_param(&self.params, name).is_some()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

fn split_host_port(hostport: &str) -> (&str, Option<&str>) {
    // IPv6 reference: the colons inside the brackets are part of the host
    if hostport.trim_start().starts_with('[') {
        if let Some(end) = hostport.find(']') {
            return (&hostport[..=end], hostport[end + 1..].strip_prefix(':'));
        }
    }

    match hostport.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (hostport, None),
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme {
            write!(f, "{}:", scheme)?;
        }

        if let Some(user) = &self.user {
            write!(f, "{}", user)?;
            if let Some(password) = &self.password {
                write!(f, ":{}", password)?;
            }
            write!(f, "@")?;
        }

        write!(f, "{}", self.host)?;

        if let Some(port) = &self.port {
            write!(f, ":{}", port)?;
        }

        for param in &self.params {
            write!(f, ";{}", param)?;
        }

        Ok(())
    }
}
