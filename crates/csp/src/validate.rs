//! Grammar checks for directive values.
//!
//! Source expressions follow the CSP 1.0 grammar:
//!
//! ```text
//! scheme-source = scheme ":"
//! host-source   = [ scheme "://" ] host [ port ]
//! scheme        = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
//! host          = "*" / [ "*." ] 1*host-char *( "." 1*host-char )
//! host-char     = ALPHA / DIGIT / "-"
//! port          = ":" ( 1*DIGIT / "*" )
//! ```
//!
//! Paths are not part of CSP 1.0 host sources and are rejected.

use crate::error::{CspError, CspResult};
use crate::source::{self, NONE};

/// Check a compacted source list. A lone `'none'` is always valid.
pub fn validate_source_list(sources: &[String]) -> CspResult<()> {
    match sources {
        [] => Err(CspError::EmptySourceList),
        [only] if only == NONE => Ok(()),
        _ => sources.iter().try_for_each(|src| validate_source(src)),
    }
}

/// Check a single source expression.
pub fn validate_source(src: &str) -> CspResult<()> {
    if source::is_keyword(src) || is_scheme_source(src) || is_host_source(src) {
        Ok(())
    } else {
        Err(CspError::InvalidSource {
            token: src.to_string(),
        })
    }
}

/// `scheme ":"` with nothing after the colon.
pub fn is_scheme_source(src: &str) -> bool {
    match src.strip_suffix(':') {
        Some(scheme) => scan_scheme(scheme) == Some(scheme.len()),
        None => false,
    }
}

/// `[ scheme "://" ] host [ port ]`
pub fn is_host_source(src: &str) -> bool {
    let rest = match scan_scheme(src) {
        Some(end) if src[end..].starts_with("://") => &src[end + 3..],
        _ => src,
    };

    let Some(host_end) = scan_host(rest) else {
        return false;
    };
    let port = &rest[host_end..];
    if port.is_empty() {
        return true;
    }
    match port.strip_prefix(':') {
        Some("*") => true,
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Length of the leading scheme, if `s` starts with one.
fn scan_scheme(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .skip(1)
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        .count();
    Some(1 + len)
}

/// Length of the leading host, if `s` starts with one.
fn scan_host(s: &str) -> Option<usize> {
    if s == "*" || s.starts_with("*:") {
        return Some(1);
    }

    let bytes = s.as_bytes();
    let mut pos = if s.starts_with("*.") { 2 } else { 0 };
    loop {
        let label = bytes[pos..].iter().take_while(|&&b| is_host_char(b)).count();
        if label == 0 {
            return None;
        }
        pos += label;
        match bytes.get(pos) {
            Some(b'.') => pos += 1,
            _ => return Some(pos),
        }
    }
}

fn is_host_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Sandbox tokens may not contain controls, whitespace or separators.
pub fn validate_sandbox(tokens: &[String]) -> CspResult<()> {
    match tokens.iter().find(|token| !is_sandbox_token(token)) {
        Some(token) => Err(CspError::InvalidSandboxToken {
            token: token.clone(),
        }),
        None => Ok(()),
    }
}

/// Whether `token` is free of the characters the sandbox grammar forbids.
pub fn is_sandbox_token(token: &str) -> bool {
    !token.chars().any(|c| {
        c.is_ascii_control()
            || matches!(
                c,
                ' ' | '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '['
                    | ']' | '?' | '=' | '{' | '}'
            )
    })
}

/// Each report uri must be a syntactically valid URI reference.
pub fn validate_report_uri(uris: &[String]) -> CspResult<()> {
    match uris.iter().find(|uri| !is_uri_reference(uri)) {
        Some(uri) => Err(CspError::InvalidReportUri { token: uri.clone() }),
        None => Ok(()),
    }
}

/// Gross syntactic check of a URI reference. Reachability is not checked,
/// nor is the authority resolved: `http:` and a port past 65535 both pass.
///
/// `;` and `,` separate directives and policies in the header, so they must
/// be percent-encoded.
pub fn is_uri_reference(uri: &str) -> bool {
    if uri
        .chars()
        .any(|c| c.is_ascii_control() || c.is_whitespace() || c == ';' || c == ',')
    {
        return false;
    }
    if !has_valid_escapes(uri) {
        return false;
    }

    let rest = match scan_scheme(uri) {
        Some(end) if uri[end..].starts_with(':') => &uri[end + 1..],
        _ => {
            // A scheme-less reference may not carry a colon in its first segment.
            let first_segment = uri.split(['/', '?', '#']).next().unwrap_or_default();
            if first_segment.contains(':') {
                return false;
            }
            uri
        }
    };

    let hier_part = rest.split(['?', '#']).next().unwrap_or_default();
    match hier_part.strip_prefix("//") {
        Some(tail) => {
            let end = tail.find('/').unwrap_or(tail.len());
            is_authority(&tail[..end])
        }
        None => true,
    }
}

/// `[ userinfo "@" ] host [ ":" *DIGIT ]`, where an IP literal host is
/// bracketed.
fn is_authority(authority: &str) -> bool {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let port = match host_port.strip_prefix('[') {
        Some(literal) => match literal.split_once(']') {
            Some((_, port)) => port,
            None => return false,
        },
        None if host_port.contains(['[', ']']) => return false,
        None => host_port.rfind(':').map_or("", |colon| &host_port[colon..]),
    };

    match port.strip_prefix(':') {
        Some(digits) => digits.bytes().all(|b| b.is_ascii_digit()),
        None => port.is_empty(),
    }
}

fn has_valid_escapes(uri: &str) -> bool {
    let bytes = uri.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
