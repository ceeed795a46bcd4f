//! AST walking and doc-comment association
//!
//! For each function/class declaration the extractor looks for a doc comment
//! by nearest-preceding-comment lookup: a block comment starting with `/**`
//! that ends within the configured line gap above the declaration, with
//! nothing but whitespace in between. Python uses the definition body's
//! leading docstring instead. Expression-form callbacks are out of scope.

use super::{CodeElement, ElementKind, Parameter, ReturnInfo, Span};
use crate::doccomment::{parse_doc, DocBlock};
use crate::parse::{CommentToken, Language, ParsedSource};

/// Extracts documentable elements from a parsed source file
pub struct ElementExtractor {
    /// Maximum number of lines between a doc comment's end and the
    /// declaration it documents
    max_comment_gap: usize,
}

impl ElementExtractor {
    pub fn new(max_comment_gap: usize) -> Self {
        Self { max_comment_gap }
    }

    /// Extract all documentable elements from a parse result
    pub fn extract(
        &self,
        parsed: &ParsedSource,
        source: &str,
        file_path: &str,
    ) -> Vec<CodeElement> {
        let mut elements = Vec::new();
        let root = parsed.tree.root_node();

        match parsed.language {
            Language::Python => self.walk_python(root, source, file_path, &mut elements),
            Language::JavaScript | Language::TypeScript => self.walk_js(
                root,
                source,
                file_path,
                parsed.language,
                &parsed.comments,
                &mut elements,
            ),
        }

        elements
    }

    fn walk_python(
        &self,
        node: tree_sitter::Node,
        source: &str,
        file_path: &str,
        elements: &mut Vec<CodeElement>,
    ) {
        match node.kind() {
            "function_definition" => {
                if let Some(element) =
                    self.extract_python_element(node, ElementKind::Function, source, file_path)
                {
                    elements.push(element);
                }
            }
            "class_definition" => {
                if let Some(element) =
                    self.extract_python_element(node, ElementKind::Class, source, file_path)
                {
                    elements.push(element);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_python(child, source, file_path, elements);
        }
    }

    fn extract_python_element(
        &self,
        node: tree_sitter::Node,
        kind: ElementKind,
        source: &str,
        file_path: &str,
    ) -> Option<CodeElement> {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .unwrap_or("anonymous")
            .to_string();

        // The docstring is reported separately, so it is excised from the
        // snippet to keep code and documentation text disjoint for scoring.
        let raw = node.utf8_text(source.as_bytes()).ok()?;
        let snippet = match python_docstring_node(node) {
            Some(string_node) => {
                let start = string_node.start_byte() - node.start_byte();
                let end = string_node.end_byte() - node.start_byte();
                format!("{}{}", &raw[..start], &raw[end..])
            }
            None => raw.to_string(),
        };

        let parameters = if kind == ElementKind::Function {
            self.python_parameters(node, source)
        } else {
            Vec::new()
        };

        let returns = node
            .child_by_field_name("return_type")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .map(|t| ReturnInfo {
                declared_type: Some(t.trim().to_string()),
                description: None,
            });

        let mut element = CodeElement {
            kind,
            name,
            doc_comment: python_docstring(node, source),
            source_snippet: snippet,
            span: Span {
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
            },
            file_path: file_path.to_string(),
            parameters,
            returns,
        };

        if let Some(doc) = element.doc_comment.clone() {
            let block = parse_doc(&doc, Language::Python.dialect());
            apply_doc_block(&mut element, &block);
        }

        Some(element)
    }

    fn python_parameters(&self, node: tree_sitter::Node, source: &str) -> Vec<Parameter> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut parameters = Vec::new();
        let mut cursor = params_node.walk();

        for child in params_node.named_children(&mut cursor) {
            let text = |n: tree_sitter::Node| n.utf8_text(source.as_bytes()).ok();

            let parameter = match child.kind() {
                "identifier" => text(child).map(|name| Parameter {
                    name: name.to_string(),
                    declared_type: None,
                    description: None,
                    required: true,
                }),
                "typed_parameter" => {
                    let name = child.named_child(0).and_then(text);
                    let declared_type = child.child_by_field_name("type").and_then(text);
                    name.map(|name| Parameter {
                        name: name.to_string(),
                        declared_type: declared_type.map(|t| t.trim().to_string()),
                        description: None,
                        required: true,
                    })
                }
                "default_parameter" => {
                    child.child_by_field_name("name").and_then(text).map(|name| Parameter {
                        name: name.to_string(),
                        declared_type: None,
                        description: None,
                        required: false,
                    })
                }
                "typed_default_parameter" => {
                    let name = child.child_by_field_name("name").and_then(text);
                    let declared_type = child.child_by_field_name("type").and_then(text);
                    name.map(|name| Parameter {
                        name: name.to_string(),
                        declared_type: declared_type.map(|t| t.trim().to_string()),
                        description: None,
                        required: false,
                    })
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => text(child).map(|name| {
                    Parameter {
                        name: name.trim_start_matches('*').to_string(),
                        declared_type: None,
                        description: None,
                        required: true,
                    }
                }),
                _ => None,
            };

            if let Some(parameter) = parameter {
                parameters.push(parameter);
            }
        }

        parameters
    }

    fn walk_js(
        &self,
        node: tree_sitter::Node,
        source: &str,
        file_path: &str,
        language: Language,
        comments: &[CommentToken],
        elements: &mut Vec<CodeElement>,
    ) {
        let kind = match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                Some(ElementKind::Function)
            }
            "class_declaration" => Some(ElementKind::Class),
            "interface_declaration" if language == Language::TypeScript => {
                Some(ElementKind::Interface)
            }
            _ => None,
        };

        if let Some(kind) = kind {
            if let Some(element) =
                self.extract_js_element(node, kind, source, file_path, language, comments)
            {
                elements.push(element);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_js(child, source, file_path, language, comments, elements);
        }
    }

    fn extract_js_element(
        &self,
        node: tree_sitter::Node,
        kind: ElementKind,
        source: &str,
        file_path: &str,
        language: Language,
        comments: &[CommentToken],
    ) -> Option<CodeElement> {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .unwrap_or("anonymous")
            .to_string();

        let snippet = node.utf8_text(source.as_bytes()).ok()?;

        let parameters = if kind == ElementKind::Function {
            self.js_parameters(node, source)
        } else {
            Vec::new()
        };

        let returns = node
            .child_by_field_name("return_type")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .map(|t| ReturnInfo {
                declared_type: Some(t.trim_start_matches(':').trim().to_string()),
                description: None,
            });

        let mut element = CodeElement {
            kind,
            name,
            doc_comment: self.preceding_doc_comment(node, source, comments),
            source_snippet: snippet.to_string(),
            span: Span {
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
            },
            file_path: file_path.to_string(),
            parameters,
            returns,
        };

        if let Some(doc) = element.doc_comment.clone() {
            let block = parse_doc(&doc, language.dialect());
            apply_doc_block(&mut element, &block);
        }

        Some(element)
    }

    fn js_parameters(&self, node: tree_sitter::Node, source: &str) -> Vec<Parameter> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut parameters = Vec::new();
        let mut cursor = params_node.walk();

        for child in params_node.named_children(&mut cursor) {
            let text = |n: tree_sitter::Node| n.utf8_text(source.as_bytes()).ok();

            let parameter = match child.kind() {
                "identifier" => text(child).map(|name| Parameter {
                    name: name.to_string(),
                    declared_type: None,
                    description: None,
                    required: true,
                }),
                "assignment_pattern" => {
                    child.child_by_field_name("left").and_then(text).map(|name| Parameter {
                        name: name.to_string(),
                        declared_type: None,
                        description: None,
                        required: false,
                    })
                }
                "rest_pattern" => text(child).map(|name| Parameter {
                    name: name.trim_start_matches('.').to_string(),
                    declared_type: None,
                    description: None,
                    required: true,
                }),
                // TypeScript parameter forms
                "required_parameter" | "optional_parameter" => {
                    let name = child.child_by_field_name("pattern").and_then(text);
                    let declared_type = child
                        .child_by_field_name("type")
                        .and_then(text)
                        .map(|t| t.trim_start_matches(':').trim().to_string());
                    let has_default = child.child_by_field_name("value").is_some();
                    let required = child.kind() == "required_parameter" && !has_default;
                    name.map(|name| Parameter {
                        name: name.trim_start_matches('.').to_string(),
                        declared_type,
                        description: None,
                        required,
                    })
                }
                "object_pattern" | "array_pattern" => text(child).map(|name| Parameter {
                    name: name.to_string(),
                    declared_type: None,
                    description: None,
                    required: true,
                }),
                _ => None,
            };

            if let Some(parameter) = parameter {
                parameters.push(parameter);
            }
        }

        parameters
    }

    /// Find the doc comment for a declaration by nearest-preceding lookup.
    ///
    /// Eligible comments are `/**` blocks ending within `max_comment_gap`
    /// lines above the declaration (or its wrapping export statement), with
    /// only whitespace between comment and declaration.
    fn preceding_doc_comment(
        &self,
        node: tree_sitter::Node,
        source: &str,
        comments: &[CommentToken],
    ) -> Option<String> {
        let anchor = match node.parent() {
            Some(parent) if parent.kind() == "export_statement" => parent,
            _ => node,
        };
        let start_line = anchor.start_position().row + 1;
        let start_byte = anchor.start_byte();

        let candidate = comments
            .iter()
            .filter(|c| c.block && c.text.starts_with("/**"))
            .filter(|c| c.end_byte <= start_byte && c.end_line < start_line)
            .filter(|c| start_line - c.end_line <= self.max_comment_gap)
            .max_by_key(|c| c.end_line)?;

        let between = &source[candidate.end_byte..start_byte];
        if between.chars().all(char::is_whitespace) {
            Some(candidate.text.clone())
        } else {
            None
        }
    }
}

impl Default for ElementExtractor {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Extract the leading docstring from a Python function or class body
fn python_docstring_node(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    let body = node.child_by_field_name("body")?;

    let mut cursor = body.walk();
    let first = body.named_children(&mut cursor).next()?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let mut inner = first.walk();
    let children: Vec<_> = first.children(&mut inner).collect();
    children.into_iter().find(|c| c.kind() == "string")
}

fn python_docstring(node: tree_sitter::Node, source: &str) -> Option<String> {
    let string_node = python_docstring_node(node)?;
    let text = string_node.utf8_text(source.as_bytes()).ok()?;
    Some(strip_string_delimiters(text).trim().to_string())
}

/// Strip exactly one pair of string delimiters, chosen by the opening
/// token, so content that itself starts or ends with a quote survives
fn strip_string_delimiters(text: &str) -> &str {
    for delimiter in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = text.strip_prefix(delimiter) {
            return inner.strip_suffix(delimiter).unwrap_or(inner);
        }
    }
    text
}

/// Merge descriptions and missing types from a structured doc comment into
/// the element's declaration-derived parameters and return record
fn apply_doc_block(element: &mut CodeElement, block: &DocBlock) {
    for parameter in &mut element.parameters {
        if let Some(doc_param) = block.params.iter().find(|p| p.name == parameter.name) {
            if parameter.description.is_none() && !doc_param.description.is_empty() {
                parameter.description = Some(doc_param.description.clone());
            }
            if parameter.declared_type.is_none() {
                parameter.declared_type = doc_param.type_name.clone();
            }
        }
    }

    if let Some(ref doc_return) = block.returns {
        let description = if doc_return.description.is_empty() {
            None
        } else {
            Some(doc_return.description.clone())
        };
        match element.returns {
            Some(ref mut ret) => {
                if ret.description.is_none() {
                    ret.description = description;
                }
                if ret.declared_type.is_none() {
                    ret.declared_type = doc_return.type_name.clone();
                }
            }
            None => {
                element.returns = Some(ReturnInfo {
                    declared_type: doc_return.type_name.clone(),
                    description,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Language, SourceParser, TreeSitterParser};
    use std::path::Path;

    fn extract(language: Language, source: &str) -> Vec<CodeElement> {
        let parser = TreeSitterParser::new(language);
        let parsed = parser.parse(Path::new("test"), source).unwrap();
        ElementExtractor::default().extract(&parsed, source, "test")
    }

    #[test]
    fn test_python_snippet_excludes_docstring() {
        let source = concat!(
            "def add(a, b):\n",
            "    \"\"\"Totally unrelated text.\"\"\"\n",
            "    return a + b\n",
        );
        let elements = extract(Language::Python, source);

        assert_eq!(elements.len(), 1);
        assert_eq!(
            elements[0].doc_comment.as_deref(),
            Some("Totally unrelated text.")
        );
        assert!(!elements[0].source_snippet.contains("unrelated"));
        assert!(elements[0].source_snippet.contains("return a + b"));
    }

    #[test]
    fn test_python_docstring_keeps_boundary_quotes() {
        let source = "def label():\n    \"\"\"\"quoted\" label\"\"\"\n    return 1\n";
        let elements = extract(Language::Python, source);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].doc_comment.as_deref(), Some("\"quoted\" label"));
    }

    #[test]
    fn test_python_function_without_docstring() {
        let elements = extract(Language::Python, "def add(a, b):\n    return a + b\n");

        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert_eq!(el.kind, ElementKind::Function);
        assert_eq!(el.name, "add");
        assert!(el.doc_comment.is_none());
        assert_eq!(el.span.start_line, 1);
        assert_eq!(el.span.end_line, 2);
        assert!(el.span.start_line <= el.span.end_line);

        let names: Vec<&str> = el.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(el.parameters.iter().all(|p| p.required));
    }

    #[test]
    fn test_python_docstring_and_annotations() {
        let source = "def scale(value: float, factor: float = 2.0) -> float:\n    \"\"\"Scale a value.\n\n    Args:\n        value (float): The input value.\n        factor: The multiplier.\n\n    Returns:\n        float: The scaled value.\n    \"\"\"\n    return value * factor\n";
        let elements = extract(Language::Python, source);

        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert!(el.doc_comment.as_deref().unwrap().starts_with("Scale a value."));

        assert_eq!(el.parameters.len(), 2);
        assert_eq!(el.parameters[0].name, "value");
        assert_eq!(el.parameters[0].declared_type.as_deref(), Some("float"));
        assert_eq!(
            el.parameters[0].description.as_deref(),
            Some("The input value.")
        );
        assert!(el.parameters[0].required);

        assert_eq!(el.parameters[1].name, "factor");
        assert!(!el.parameters[1].required);

        let ret = el.returns.as_ref().unwrap();
        assert_eq!(ret.declared_type.as_deref(), Some("float"));
        assert_eq!(ret.description.as_deref(), Some("The scaled value."));
    }

    #[test]
    fn test_python_class_with_docstring() {
        let source = "class Greeter:\n    \"\"\"Says hello.\"\"\"\n\n    def greet(self):\n        return \"hi\"\n";
        let elements = extract(Language::Python, source);

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].kind, ElementKind::Class);
        assert_eq!(elements[0].name, "Greeter");
        assert_eq!(elements[0].doc_comment.as_deref(), Some("Says hello."));
        assert_eq!(elements[1].kind, ElementKind::Function);
        assert_eq!(elements[1].name, "greet");
        assert!(elements[1].doc_comment.is_none());
    }

    #[test]
    fn test_jsdoc_association_immediately_above() {
        let source = "/** adds two numbers\n * @param {number} a\n * @param {number} b\n * @returns {number} sum */\nfunction add(a, b) { return a + b; }\n";
        let elements = extract(Language::JavaScript, source);

        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert_eq!(el.name, "add");
        assert!(el.doc_comment.as_deref().unwrap().starts_with("/**"));
        assert_eq!(el.parameters.len(), 2);
        assert_eq!(el.parameters[0].declared_type.as_deref(), Some("number"));
        assert_eq!(el.returns.as_ref().unwrap().declared_type.as_deref(), Some("number"));
    }

    #[test]
    fn test_comment_beyond_gap_not_associated() {
        let source = "/** adds */\n\n\nfunction add(a, b) { return a + b; }\n";
        let elements = extract(Language::JavaScript, source);

        assert_eq!(elements.len(), 1);
        assert!(elements[0].doc_comment.is_none());

        // a wider configured gap picks the same comment up
        let parser = TreeSitterParser::new(Language::JavaScript);
        let parsed = parser.parse(Path::new("test.js"), source).unwrap();
        let elements = ElementExtractor::new(3).extract(&parsed, source, "test.js");
        assert!(elements[0].doc_comment.is_some());
    }

    #[test]
    fn test_line_comment_is_not_a_doc_comment() {
        let source = "// adds two numbers\nfunction add(a, b) { return a + b; }\n";
        let elements = extract(Language::JavaScript, source);

        assert_eq!(elements.len(), 1);
        assert!(elements[0].doc_comment.is_none());
    }

    #[test]
    fn test_js_default_parameter_is_optional() {
        let source = "function greet(name, punctuation = \"!\") { return name + punctuation; }\n";
        let elements = extract(Language::JavaScript, source);

        let el = &elements[0];
        assert_eq!(el.parameters.len(), 2);
        assert!(el.parameters[0].required);
        assert!(!el.parameters[1].required);
    }

    #[test]
    fn test_exported_function_keeps_doc_comment() {
        let source = "/** doubles a value */\nexport function double(x) { return x * 2; }\n";
        let elements = extract(Language::JavaScript, source);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "double");
        assert!(elements[0].doc_comment.is_some());
    }

    #[test]
    fn test_typescript_optional_and_typed_parameters() {
        let source = "function join(parts: string[], sep?: string): string { return parts.join(sep); }\n";
        let elements = extract(Language::TypeScript, source);

        let el = &elements[0];
        assert_eq!(el.parameters.len(), 2);
        assert_eq!(el.parameters[0].name, "parts");
        assert_eq!(el.parameters[0].declared_type.as_deref(), Some("string[]"));
        assert!(el.parameters[0].required);
        assert_eq!(el.parameters[1].name, "sep");
        assert!(!el.parameters[1].required);
        assert_eq!(el.returns.as_ref().unwrap().declared_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_typescript_interface() {
        let source = "/** a point in 2d space */\ninterface Point { x: number; y: number; }\n";
        let elements = extract(Language::TypeScript, source);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Interface);
        assert_eq!(elements[0].name, "Point");
        assert!(elements[0].doc_comment.is_some());
    }
}
