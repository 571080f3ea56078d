//! Short name capability shared by configuration entities

use serde::{Deserialize, Serialize};

/// Entities that carry a short name used as a naming segment
pub trait HasShortName {
    fn short_name(&self) -> &str;
    fn set_short_name(&mut self, value: String);
}

/// Case policy applied to configured short names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortNameCase {
    #[default]
    Preserve,
    Lower,
    Upper,
}

impl std::str::FromStr for ShortNameCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" => Ok(ShortNameCase::Preserve),
            "lower" | "lowercase" => Ok(ShortNameCase::Lower),
            "upper" | "uppercase" => Ok(ShortNameCase::Upper),
            _ => Err(format!("Invalid short name case: {}", s)),
        }
    }
}

/// Rewrite an entity's short name according to `case`
pub fn apply_short_name_case(item: &mut dyn HasShortName, case: ShortNameCase) {
    let converted = match case {
        ShortNameCase::Preserve => return,
        ShortNameCase::Lower => item.short_name().to_lowercase(),
        ShortNameCase::Upper => item.short_name().to_uppercase(),
    };
    item.set_short_name(converted);
}
