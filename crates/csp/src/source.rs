//! Reserved source tokens.

/// The empty source list. Negates every value previously declared for the
/// same directive. Only meaningful for `*-src` directives; on `sandbox` and
/// `report-uri` a lone `'none'` removes the directive from the output.
pub const NONE: &str = "'none'";

/// Same-origin keyword source.
pub const SELF: &str = "'self'";

/// Allows inline script and style.
pub const UNSAFE_INLINE: &str = "'unsafe-inline'";

/// Allows `eval()` and friends.
pub const UNSAFE_EVAL: &str = "'unsafe-eval'";

/// Scheme source matching any https origin.
pub const HTTPS: &str = "https:";

/// Keyword sources accepted in a source list besides `'none'`.
pub const KEYWORD_SOURCES: [&str; 3] = [SELF, UNSAFE_INLINE, UNSAFE_EVAL];

/// Whether `token` is one of the quoted keyword sources.
pub fn is_keyword(token: &str) -> bool {
    KEYWORD_SOURCES.iter().any(|keyword| *keyword == token)
}
