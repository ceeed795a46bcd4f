//! docdrift - Documentation drift analyzer
//!
//! This library analyzes codebases for documentation issues: public
//! elements with no documentation, and documentation whose content has
//! drifted away from the code it describes.

pub mod analyze;
pub mod cli;
pub mod doccomment;
pub mod error;
pub mod extract;
pub mod parse;
pub mod report;
pub mod score;

/// Re-export commonly used types
pub use analyze::{Analyzer, AnalyzerConfig, DocumentationIssue, IssueKind};
pub use error::AnalyzeError;
pub use extract::CodeElement;
pub use report::{generate_report, AnalysisReport};
pub use score::{EmbeddingProvider, SimilarityScorer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docdrift";
