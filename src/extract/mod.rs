//! Documentable element extraction
//!
//! Walks a parsed syntax tree and produces [`CodeElement`]s: functions,
//! classes and interfaces together with their associated doc comments,
//! declaration parameters and return information.

mod elements;

pub use elements::ElementExtractor;

use serde::{Deserialize, Serialize};

/// Kind of documentable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Function,
    Class,
    Interface,
    Variable,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Function => write!(f, "function"),
            ElementKind::Class => write!(f, "class"),
            ElementKind::Interface => write!(f, "interface"),
            ElementKind::Variable => write!(f, "variable"),
        }
    }
}

/// Source span, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

/// One declared parameter, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    /// Type annotation from the declaration, or from the doc comment when
    /// the declaration has none
    pub declared_type: Option<String>,
    /// Description from the doc comment, if any
    pub description: Option<String>,
    /// False only when the declaration or doc type carries an explicit
    /// default/optional marker
    pub required: bool,
}

/// Return type and description, when declared or documented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnInfo {
    pub declared_type: Option<String>,
    pub description: Option<String>,
}

/// A documentable unit extracted from source code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeElement {
    pub kind: ElementKind,
    /// Identifier, or "anonymous" if unbound
    pub name: String,
    /// Raw doc comment text found for the element, extracted once per parse
    pub doc_comment: Option<String>,
    /// Source text of the element, with any embedded docstring removed so
    /// code and documentation stay disjoint for similarity scoring
    pub source_snippet: String,
    pub span: Span,
    pub file_path: String,
    pub parameters: Vec<Parameter>,
    pub returns: Option<ReturnInfo>,
}

