//! Source parsing using tree-sitter
//!
//! Turns the raw text of one file into a language-neutral syntax tree plus a
//! list of comment tokens with source spans. Dispatch is by file extension
//! through a registry, so new languages can be added without touching the
//! analyzer.

use crate::error::{AnalyzeError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    /// Get the tree-sitter grammar for this language
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    /// The doc-comment dialect conventionally used by this language
    pub fn dialect(&self) -> crate::doccomment::Dialect {
        match self {
            Language::Python => crate::doccomment::Dialect::Google,
            Language::JavaScript | Language::TypeScript => crate::doccomment::Dialect::Jsdoc,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::JavaScript => write!(f, "javascript"),
            Language::TypeScript => write!(f, "typescript"),
        }
    }
}

/// A comment found during parsing, with its source span
#[derive(Debug, Clone)]
pub struct CommentToken {
    /// Raw comment text, including markers
    pub text: String,
    /// 1-based line the comment starts on
    pub start_line: usize,
    /// 1-based line the comment ends on
    pub end_line: usize,
    /// Byte offset of the comment start
    pub start_byte: usize,
    /// Byte offset just past the comment end
    pub end_byte: usize,
    /// Block comment (`/* ... */`) vs line comment
    pub block: bool,
}

/// Result of parsing one file
pub struct ParsedSource {
    pub language: Language,
    pub tree: tree_sitter::Tree,
    pub comments: Vec<CommentToken>,
}

/// Capability interface for language parsers
pub trait SourceParser: Send + Sync {
    /// The language this parser handles
    fn language(&self) -> Language;

    /// Parse file content into a syntax tree and comment list
    fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource>;
}

/// Tree-sitter backed parser for one language
pub struct TreeSitterParser {
    language: Language,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl SourceParser for TreeSitterParser {
    fn language(&self) -> Language {
        self.language
    }

    fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource> {
        // tree_sitter::Parser is not Sync, so one is created per call;
        // construction is cheap compared to parsing.
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language.tree_sitter_language())
            .map_err(|e| AnalyzeError::Parse {
                path: path.to_path_buf(),
                message: format!("failed to load {} grammar: {}", self.language, e),
            })?;

        let tree = parser.parse(content, None).ok_or_else(|| AnalyzeError::Parse {
            path: path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;

        if tree.root_node().has_error() {
            return Err(AnalyzeError::Parse {
                path: path.to_path_buf(),
                message: "syntax error".to_string(),
            });
        }

        let comments = collect_comments(tree.root_node(), content);

        Ok(ParsedSource {
            language: self.language,
            tree,
            comments,
        })
    }
}

/// Collect all comment nodes in the tree, in source order
fn collect_comments(root: tree_sitter::Node, source: &str) -> Vec<CommentToken> {
    let mut comments = Vec::new();
    let mut cursor = root.walk();
    collect_comments_into(root, source, &mut cursor, &mut comments);
    comments
}

fn collect_comments_into<'a>(
    node: tree_sitter::Node<'a>,
    source: &str,
    cursor: &mut tree_sitter::TreeCursor<'a>,
    comments: &mut Vec<CommentToken>,
) {
    for child in node.children(cursor) {
        if child.kind() == "comment" {
            if let Ok(text) = child.utf8_text(source.as_bytes()) {
                comments.push(CommentToken {
                    text: text.to_string(),
                    start_line: child.start_position().row + 1,
                    end_line: child.end_position().row + 1,
                    start_byte: child.start_byte(),
                    end_byte: child.end_byte(),
                    block: text.starts_with("/*"),
                });
            }
        } else if child.child_count() > 0 {
            let mut inner = child.walk();
            collect_comments_into(child, source, &mut inner, comments);
        }
    }
}

/// Registry mapping file extensions to parsers
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn SourceParser>>,
}

impl ParserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Create a registry with the default language set (Python, JavaScript,
    /// TypeScript)
    pub fn with_default_languages() -> Self {
        let mut registry = Self::new();
        registry.register("py", Arc::new(TreeSitterParser::new(Language::Python)));
        registry.register("js", Arc::new(TreeSitterParser::new(Language::JavaScript)));
        registry.register("jsx", Arc::new(TreeSitterParser::new(Language::JavaScript)));
        registry.register("ts", Arc::new(TreeSitterParser::new(Language::TypeScript)));
        registry
    }

    /// Register a parser for an extension, replacing any existing entry
    pub fn register(&mut self, extension: &str, parser: Arc<dyn SourceParser>) {
        self.parsers.insert(extension.to_lowercase(), parser);
    }

    /// Look up the parser for an extension; `None` for unsupported
    /// extensions, which is a benign no-op rather than an error.
    pub fn get(&self, extension: &str) -> Option<Arc<dyn SourceParser>> {
        self.parsers.get(&extension.to_lowercase()).cloned()
    }

    /// Whether any parser is registered for this extension
    pub fn supports(&self, extension: &str) -> bool {
        self.parsers.contains_key(&extension.to_lowercase())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_default_languages()
    }
}
