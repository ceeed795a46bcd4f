//! Doc-comment structuring
//!
//! Parses raw doc-comment text into a normalized record of description,
//! parameter descriptors and return descriptor, according to the comment
//! dialect in use. Also generates dialect-appropriate suggestion templates
//! for elements with missing or inconsistent documentation.

mod google;
mod jsdoc;
mod template;

pub use template::suggestion_template;

use serde::{Deserialize, Serialize};

/// Comment-syntax convention governing how structured fields are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// JSDoc-style `@`-tags, used by C-family languages
    Jsdoc,
    /// Google-style docstring sections (`Args:`, `Returns:`), used by Python
    Google,
}

/// Parameter descriptor parsed from a doc comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    pub type_name: Option<String>,
    pub description: String,
    /// False when the type token or name carries a default/optional marker
    pub required: bool,
}

/// Return descriptor parsed from a doc comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocReturn {
    pub type_name: Option<String>,
    pub description: String,
}

/// Normalized doc-comment record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Free-text description preceding any structured field
    pub description: String,
    /// Parameter descriptors in the order they appear
    pub params: Vec<DocParam>,
    pub returns: Option<DocReturn>,
}

impl DocBlock {
    /// True when no field of the record carries any content
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.params.is_empty() && self.returns.is_none()
    }
}

/// Parse raw comment text according to its dialect.
///
/// Malformed fields are dropped, never fatal; an empty comment yields an
/// empty record.
pub fn parse_doc(text: &str, dialect: Dialect) -> DocBlock {
    match dialect {
        Dialect::Jsdoc => jsdoc::parse(text),
        Dialect::Google => google::parse(text),
    }
}
