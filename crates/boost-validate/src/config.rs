//! # Engine Configuration
//!
//! Bounds applied during analysis and rendering. Defaults suit the field
//! table; `from_env` lets deployments tighten or relax them without a
//! rebuild.

/// Default nesting limit for the field walk.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default upper bound on any rendered value, in characters.
pub const DEFAULT_MAX_DISPLAY_LEN: usize = 100;

/// Default truncation length for plain string values, in characters.
pub const DEFAULT_MAX_STRING_LEN: usize = 50;

/// Analysis and rendering bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Object nesting depth beyond which the analyzer stops descending and
    /// records a structural error.
    pub max_depth: usize,
    /// Hard cap on every rendered display value.
    pub max_display_len: usize,
    /// Truncation length for quoted string values.
    pub max_string_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_display_len: DEFAULT_MAX_DISPLAY_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from `BOOST_MAX_DEPTH`, `BOOST_MAX_DISPLAY_LEN`
    /// and `BOOST_MAX_STRING_LEN`, falling back to defaults.
    ///
    /// Unparsable or zero values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: env_usize("BOOST_MAX_DEPTH").unwrap_or(defaults.max_depth),
            max_display_len: env_usize("BOOST_MAX_DISPLAY_LEN")
                .unwrap_or(defaults.max_display_len),
            max_string_len: env_usize("BOOST_MAX_STRING_LEN")
                .unwrap_or(defaults.max_string_len),
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(var = name, value = %raw, "ignoring invalid engine setting");
            None
        }
    }
}
