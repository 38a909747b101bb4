//! Directive names and compacted directives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CspError, CspResult};
use crate::validate;

/// The CSP 1.0 directives a policy may carry.
/// Using an enum keeps the emitted names fixed and case-exact.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveName {
    DefaultSrc,
    ScriptSrc,
    ObjectSrc,
    StyleSrc,
    ImgSrc,
    MediaSrc,
    FrameSrc,
    FontSrc,
    ConnectSrc,
    Sandbox,
    ReportUri,
}

impl DirectiveName {
    /// Every directive, in declaration order.
    pub const ALL: [DirectiveName; 11] = [
        DirectiveName::DefaultSrc,
        DirectiveName::ScriptSrc,
        DirectiveName::ObjectSrc,
        DirectiveName::StyleSrc,
        DirectiveName::ImgSrc,
        DirectiveName::MediaSrc,
        DirectiveName::FrameSrc,
        DirectiveName::FontSrc,
        DirectiveName::ConnectSrc,
        DirectiveName::Sandbox,
        DirectiveName::ReportUri,
    ];

    /// The name as it appears in the header.
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveName::DefaultSrc => "default-src",
            DirectiveName::ScriptSrc => "script-src",
            DirectiveName::ObjectSrc => "object-src",
            DirectiveName::StyleSrc => "style-src",
            DirectiveName::ImgSrc => "img-src",
            DirectiveName::MediaSrc => "media-src",
            DirectiveName::FrameSrc => "frame-src",
            DirectiveName::FontSrc => "font-src",
            DirectiveName::ConnectSrc => "connect-src",
            DirectiveName::Sandbox => "sandbox",
            DirectiveName::ReportUri => "report-uri",
        }
    }

    /// Whether the directive takes a source list.
    pub fn is_source_list(&self) -> bool {
        !matches!(self, DirectiveName::Sandbox | DirectiveName::ReportUri)
    }

    /// Whether a lone `'none'` must drop the directive instead of being emitted.
    pub(crate) fn rejects_bare_none(&self) -> bool {
        !self.is_source_list()
    }

    /// Run the grammar check that applies to this directive's values.
    pub fn validate(&self, values: &[String]) -> CspResult<()> {
        match self {
            DirectiveName::Sandbox => validate::validate_sandbox(values),
            DirectiveName::ReportUri => validate::validate_report_uri(values),
            _ => validate::validate_source_list(values),
        }
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown directive name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown directive: {0:?}")]
pub struct UnknownDirective(pub String);

impl FromStr for DirectiveName {
    type Err = UnknownDirective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DirectiveName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownDirective(s.to_string()))
    }
}

/// A directive with its compacted value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub name: DirectiveName,
    pub values: Vec<String>,
}

impl Directive {
    pub fn new(name: DirectiveName, values: Vec<String>) -> Self {
        Self { name, values }
    }

    /// Check the values against the directive's grammar.
    pub fn validate(&self) -> Result<(), CspError> {
        self.name.validate(&self.values)
    }

    /// The space-joined value list. Empty tokens are skipped.
    pub fn render_values(&self) -> String {
        self.values
            .iter()
            .filter(|value| !value.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.render_values())
    }
}
