//! Instance numbers for auto-increment resolution

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NamingResult;

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+$").unwrap());

/// Rebuilds a candidate around a different instance value
pub trait InstanceRebuilder: Send + Sync {
    /// Instance value the candidate was built with, empty when it had none
    fn current_instance(&self) -> &str;

    fn rebuild(&self, instance: &str) -> NamingResult<String>;
}

/// Trailing number of a name or instance value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSegment {
    /// Text in front of the number
    pub prefix: String,
    pub value: u64,
    pub width: usize,
}

impl InstanceSegment {
    /// Locate the trailing number of `text`.
    ///
    /// Without one the number starts at 0 and is appended after `delimiter`.
    pub fn parse(text: &str, padding: usize, delimiter: &str) -> Self {
        if let Some(found) = TRAILING_DIGITS.find(text)
            && let Ok(value) = found.as_str().parse::<u64>()
        {
            return Self {
                prefix: text[..found.start()].to_string(),
                value,
                width: padding.max(found.as_str().len()),
            };
        }

        let prefix = if text.is_empty() || text.ends_with(delimiter) {
            text.to_string()
        } else {
            format!("{text}{delimiter}")
        };
        Self {
            prefix,
            value: 0,
            width: padding,
        }
    }

    /// Text with the number `steps` increments past the original, zero padded
    pub fn next(&self, steps: u64) -> String {
        format!(
            "{}{:0width$}",
            self.prefix,
            self.value.saturating_add(steps),
            width = self.width
        )
    }
}
