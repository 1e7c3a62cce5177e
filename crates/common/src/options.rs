//! Rendering configuration

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target language of the generated stubs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Jsonnet,
    Js,
}

impl Lang {
    /// File extension, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Lang::Jsonnet => ".jsonnet",
            Lang::Js => ".js",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::Jsonnet => write!(f, "jsonnet"),
            Lang::Js => write!(f, "js"),
        }
    }
}

impl FromStr for Lang {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jsonnet" => Ok(Lang::Jsonnet),
            "js" | "javascript" => Ok(Lang::Js),
            _ => Err(GeneratorError::InvalidOptions(format!(
                "invalid language {:?}",
                s
            ))),
        }
    }
}

/// Quote character used for string literals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    /// Wrap `s` in quotes, escaping backslashes and the quote character
    pub fn quote(&self, s: &str) -> String {
        let q = match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        };
        let mut quoted = String::with_capacity(s.len() + 2);
        quoted.push(q);
        for ch in s.chars() {
            if ch == q || ch == '\\' {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        quoted.push(q);
        quoted
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStyle::Double => write!(f, "double"),
            QuoteStyle::Single => write!(f, "single"),
        }
    }
}

impl FromStr for QuoteStyle {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "double" => Ok(QuoteStyle::Double),
            "single" => Ok(QuoteStyle::Single),
            _ => Err(GeneratorError::InvalidOptions(format!(
                "invalid quote style {:?}",
                s
            ))),
        }
    }
}

/// Options controlling synthesis and rendering of method stubs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Emit inline type comments
    pub annotate: bool,

    /// How many times a message type is fully expanded along one descent
    /// path before further occurrences collapse to a reference
    pub expansion_budget: u32,

    /// Add a `metadata` parameter to the stub signature
    pub include_metadata_param: bool,

    pub quote_style: QuoteStyle,

    pub lang: Lang,

    /// Render only the request/response type names
    pub minimal: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            annotate: true,
            expansion_budget: 1,
            include_metadata_param: false,
            quote_style: QuoteStyle::Double,
            lang: Lang::Jsonnet,
            minimal: false,
        }
    }
}

impl RenderOptions {
    /// Reject configurations that cannot bound recursion
    pub fn validate(&self) -> Result<()> {
        if self.expansion_budget == 0 {
            return Err(GeneratorError::InvalidOptions(
                "expansion budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn quote(&self, s: &str) -> String {
        self.quote_style.quote(s)
    }
}
