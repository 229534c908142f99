use log::warn;
use regex::Regex;

/// State-label matcher: a compiled regex, or case-insensitive containment
/// when the pattern does not compile
#[derive(Debug, Clone)]
pub enum StatePattern {
    Regex(Regex),
    Substring(String),
}

impl StatePattern {
    pub fn compile(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => StatePattern::Regex(regex),
            Err(e) => {
                warn!("Pattern '{}' is not a valid regex ({}), matching as substring", pattern, e);
                StatePattern::Substring(pattern.to_lowercase())
            }
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            StatePattern::Regex(regex) => regex.is_match(label),
            StatePattern::Substring(needle) => label.to_lowercase().contains(needle.as_str()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StatePattern::Substring(_))
    }
}
