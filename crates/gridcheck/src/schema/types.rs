//! Column type taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridcheckError;

/// Classification of a column inferred from its values.
///
/// The variant names double as the names of the built-in rules that check
/// them, so a detected type can be assigned directly as a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// Free text (also the type of an empty column).
    Text,
    /// Email addresses.
    Email,
    /// Dates in `DD-MM-YYYY` or `YYYY-MM-DD` form.
    Date,
    /// `true`/`false`/`0`/`1`.
    Boolean,
    /// Whole numbers.
    Int,
    /// Decimal numbers.
    Float,
    /// Letters and digits only.
    Alphanumeric,
}

impl TypeTag {
    /// All tags, in detection priority order.
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Email,
        TypeTag::Date,
        TypeTag::Boolean,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Alphanumeric,
        TypeTag::Text,
    ];

    /// The tag's name, which is also its rule name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Text => "Text",
            TypeTag::Email => "Email",
            TypeTag::Date => "Date",
            TypeTag::Boolean => "Boolean",
            TypeTag::Int => "Int",
            TypeTag::Float => "Float",
            TypeTag::Alphanumeric => "Alphanumeric",
        }
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Float)
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        TypeTag::Text
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = GridcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GridcheckError::UnknownRule(s.to_string()))
    }
}
