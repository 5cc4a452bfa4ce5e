//! Rule names resolved into evaluable rules.
//!
//! Rules are addressed by name everywhere outside the engine (column-to-rules
//! maps, catalogs, reports). [`resolve_rule`] turns a name and its catalog
//! entry into a closed [`Rule`] so evaluation can match exhaustively.

mod dates;

use std::fmt;

use serde::Deserialize;
use tracing::debug;

pub use dates::{
    DATE_FORMAT_TABLE, DEFAULT_ACCEPTED_DATE_FORMATS, FALLBACK_PARSE_FORMAT,
    TRANSFORM_ONLY_FORMATS, matches_any, parse_date, parse_format_for, transform_format_for,
};

use crate::catalog::{RuleCatalog, RuleDescriptor};
use crate::error::{GridcheckError, Result};

/// Prefix of date rules carrying their own display format.
pub const DATE_RULE_PREFIX: &str = "Date(";

/// Prefix of rules that transform values instead of checking them.
pub const TRANSFORM_RULE_PREFIX: &str = "Transform-Date(";

/// How a composite rule combines its base rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// Every base rule must pass.
    And,
    /// At least one base rule must pass.
    Or,
}

impl Logic {
    /// Parse `AND`/`OR`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("AND") {
            Some(Logic::And)
        } else if s.trim().eq_ignore_ascii_case("OR") {
            Some(Logic::Or)
        } else {
            None
        }
    }

    /// Value of a combination before any base rule is applied.
    pub fn identity(self) -> bool {
        match self {
            Logic::And => true,
            Logic::Or => false,
        }
    }

    /// Fold one more base-rule outcome into the combination.
    pub fn combine(self, acc: bool, passed: bool) -> bool {
        match self {
            Logic::And => acc && passed,
            Logic::Or => acc || passed,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => f.write_str("AND"),
            Logic::Or => f.write_str("OR"),
        }
    }
}

/// An evaluable rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Cell must not be null or blank.
    Required,
    /// Optional leading `-`, then digits.
    Int,
    /// Parses as a floating-point literal.
    Float,
    /// Letters, spaces, `"`, `(` and `)` only.
    Text,
    /// Email address shape.
    Email,
    /// `true`, `false`, `0` or `1`, ignoring case.
    Boolean,
    /// ASCII letters and digits only.
    Alphanumeric,
    /// Any of the caller's accepted date formats.
    Date,
    /// One specific display format, e.g. `Date(MM/DD/YYYY)`.
    DateWithFormat {
        /// Display token cited in findings.
        source: String,
        /// strftime-style format values must parse under.
        parse: String,
    },
    /// Composition of other rules by name.
    Custom {
        logic: Logic,
        base_rules: Vec<String>,
    },
    /// Arithmetic or comparison formula over columns.
    Formula(String),
}

impl Rule {
    /// Resolve a built-in rule name without consulting a catalog.
    pub fn builtin(name: &str) -> Option<Self> {
        let rule = match name {
            "Required" => Rule::Required,
            "Int" => Rule::Int,
            "Float" => Rule::Float,
            "Text" => Rule::Text,
            "Email" => Rule::Email,
            "Boolean" => Rule::Boolean,
            "Alphanumeric" => Rule::Alphanumeric,
            "Date" => Rule::Date,
            _ => return None,
        };
        Some(rule)
    }
}

/// Composite rule parameters as stored in a descriptor.
#[derive(Debug, Deserialize)]
struct CompositeParameters {
    logic: String,
    #[serde(default)]
    base_rules: Vec<String>,
}

/// Whether a rule name is a date transformation rather than a check.
pub fn is_transform_rule(name: &str) -> bool {
    name.starts_with(TRANSFORM_RULE_PREFIX)
}

/// The display token of a `Date(<token>)` rule name.
pub fn date_token(name: &str) -> Option<&str> {
    name.strip_prefix(DATE_RULE_PREFIX)
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim)
}

/// Resolve a rule name into an evaluable rule.
///
/// `Date(<token>)` names take the descriptor's source format when the catalog
/// has one, else the token; an unknown token parses as `DD-MM-YYYY`. Custom
/// descriptors hold either `{logic, base_rules}` JSON or formula text. Names
/// the catalog does not know and that are not built in fail with
/// [`GridcheckError::UnknownRule`].
pub fn resolve_rule(name: &str, catalog: &dyn RuleCatalog) -> Result<Rule> {
    let descriptor = catalog.lookup_rule(name);

    if let Some(token) = date_token(name) {
        let source = descriptor
            .as_ref()
            .and_then(|d| d.source_format.clone())
            .unwrap_or_else(|| token.to_string());

        let parse = match parse_format_for(&source) {
            Some(format) => format,
            None if descriptor.is_some() => FALLBACK_PARSE_FORMAT,
            None => return Err(GridcheckError::UnknownRule(name.to_string())),
        };

        debug!(rule = name, source = %source, parse, "Date rule resolved");
        return Ok(Rule::DateWithFormat {
            source,
            parse: parse.to_string(),
        });
    }

    match descriptor {
        Some(d) if d.is_custom => resolve_custom(&d),
        _ => Rule::builtin(name).ok_or_else(|| GridcheckError::UnknownRule(name.to_string())),
    }
}

/// Turn a custom descriptor into a composite or formula rule.
fn resolve_custom(descriptor: &RuleDescriptor) -> Result<Rule> {
    let invalid = |message: String| GridcheckError::InvalidRule {
        name: descriptor.rule_name.clone(),
        message,
    };

    let parameters = descriptor.parameters.trim();
    if parameters.is_empty() {
        return Err(invalid("custom rule has no parameters".to_string()));
    }

    let value = match serde_json::from_str::<serde_json::Value>(parameters) {
        Ok(value) => value,
        // Anything that is not JSON is formula text.
        Err(_) => return Ok(Rule::Formula(parameters.to_string())),
    };

    if !value.is_object() {
        return Err(invalid(format!("expected a JSON object, got {}", value)));
    }

    let params: CompositeParameters =
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

    let logic = Logic::parse(&params.logic)
        .ok_or_else(|| invalid(format!("logic must be AND or OR, got '{}'", params.logic)))?;

    if params.base_rules.is_empty() {
        return Err(invalid("composite rule has no base rules".to_string()));
    }

    Ok(Rule::Custom {
        logic,
        base_rules: params.base_rules,
    })
}
