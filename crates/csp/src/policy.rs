//! The persistent policy builder.
//!
//! A [`Policy`] is a value: every directive method returns a new policy and
//! leaves the receiver untouched, so one base policy can be forked into any
//! number of route-specific variants.
//!
//! ```
//! use citadel_csp::{CompileOptions, Policy, NONE, SELF};
//!
//! let base = Policy::with_options(CompileOptions::deterministic())
//!     .default_src([NONE])
//!     .img_src(["*"]);
//! let scripted = base.script_src([SELF]);
//!
//! assert_eq!(base.must_compile().as_str(), "default-src 'none'; img-src *");
//! assert_eq!(
//!     scripted.must_compile().as_str(),
//!     "default-src 'none'; img-src *; script-src 'self'"
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use crate::compact;
use crate::compiled::CompiledPolicy;
use crate::config::CompileOptions;
use crate::directive::{Directive, DirectiveName};
use crate::error::CspResult;

/// A single `(directive, value)` pair as declared by one builder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    name: DirectiveName,
    value: Arc<str>,
}

impl Fragment {
    pub fn new(name: DirectiveName, value: impl Into<Arc<str>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> DirectiveName {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.name, self.value)
    }
}

/// An append-only Content Security Policy.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Shared, never written after construction. Appending allocates a new slice.
    fragments: Arc<[Fragment]>,
    options: CompileOptions,
}

impl Policy {
    /// Create an empty policy with default compile options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty policy carrying explicit compile options
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            fragments: Arc::from(Vec::new()),
            options,
        }
    }

    /// The raw fragments in declaration order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Derive a policy with one fragment per token appended for `name`.
    pub fn directive<I, S>(&self, name: DirectiveName, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added: Vec<Fragment> = values
            .into_iter()
            .map(|value| {
                let value: String = value.into();
                Fragment::new(name, value)
            })
            .collect();

        let mut fragments = Vec::with_capacity(self.fragments.len() + added.len());
        fragments.extend(self.fragments.iter().cloned());
        fragments.extend(added);

        Self {
            fragments: fragments.into(),
            options: self.options,
        }
    }

    /// The default-src directive.
    pub fn default_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::DefaultSrc, sources)
    }

    /// The script-src directive.
    pub fn script_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::ScriptSrc, sources)
    }

    /// The object-src directive.
    pub fn object_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::ObjectSrc, sources)
    }

    /// The style-src directive.
    pub fn style_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::StyleSrc, sources)
    }

    /// The img-src directive.
    pub fn img_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::ImgSrc, sources)
    }

    /// The media-src directive.
    pub fn media_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::MediaSrc, sources)
    }

    /// The frame-src directive.
    pub fn frame_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::FrameSrc, sources)
    }

    /// The font-src directive.
    pub fn font_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::FontSrc, sources)
    }

    /// The connect-src directive.
    pub fn connect_src<I, S>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::ConnectSrc, sources)
    }

    /// The sandbox directive.
    pub fn sandbox<I, S>(&self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::Sandbox, tokens)
    }

    /// The report-uri directive.
    pub fn report_uri<I, S>(&self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directive(DirectiveName::ReportUri, uris)
    }

    /// Compact and validate the policy.
    ///
    /// Returns the surviving directives, or the first grammar error found.
    pub fn check(&self) -> CspResult<Vec<Directive>> {
        self.check_with(&self.options)
    }

    fn check_with(&self, options: &CompileOptions) -> CspResult<Vec<Directive>> {
        let directives = compact::compact(&self.fragments, options);
        for directive in &directives {
            directive.validate()?;
        }
        Ok(directives)
    }

    /// Compile into a header value using the policy's own options.
    pub fn compile(&self) -> CspResult<CompiledPolicy> {
        self.compile_with(&self.options)
    }

    /// Compile into a header value, overriding the policy's options.
    pub fn compile_with(&self, options: &CompileOptions) -> CspResult<CompiledPolicy> {
        let directives = self.check_with(options)?;
        let compiled = CompiledPolicy::from_directives(&directives);
        log::debug!(
            "compiled {} fragments into {} directives ({} bytes)",
            self.fragments.len(),
            directives.len(),
            compiled.as_str().len()
        );
        Ok(compiled)
    }

    /// Compile a policy known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if the policy fails validation. Only use this for policies
    /// built from constants, never from untrusted input.
    pub fn must_compile(&self) -> CompiledPolicy {
        self.compile()
            .unwrap_or_else(|err| panic!("invalid content security policy: {err}"))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::with_options(CompileOptions::default())
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{fragment}")?;
        }
        f.write_str("]")
    }
}
