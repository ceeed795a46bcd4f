//! Suggestion template generation
//!
//! Produces a fixed, deterministic doc-comment skeleton for an element:
//! a description placeholder, one entry per known parameter, and a return
//! entry. Re-parsing a template with the structurer yields the element's
//! parameter names in declaration order.

use super::Dialect;
use crate::extract::CodeElement;

/// Generate a dialect-appropriate empty-field doc-comment template
pub fn suggestion_template(element: &CodeElement, dialect: Dialect) -> String {
    match dialect {
        Dialect::Jsdoc => jsdoc_template(element),
        Dialect::Google => google_template(element),
    }
}

fn jsdoc_template(element: &CodeElement) -> String {
    let mut out = String::from("/**\n");
    out.push_str(&format!(" * Describe what `{}` does.\n", element.name));
    out.push_str(" *\n");

    for param in &element.parameters {
        let type_name = param.declared_type.as_deref().unwrap_or("any");
        if param.required {
            out.push_str(&format!(
                " * @param {{{}}} {} - Describe `{}`.\n",
                type_name, param.name, param.name
            ));
        } else {
            out.push_str(&format!(
                " * @param {{{}}} [{}] - Describe `{}`.\n",
                type_name, param.name, param.name
            ));
        }
    }

    let return_type = element
        .returns
        .as_ref()
        .and_then(|r| r.declared_type.clone())
        .unwrap_or_else(|| "any".to_string());
    out.push_str(&format!(
        " * @returns {{{}}} Describe the return value.\n",
        return_type
    ));

    out.push_str(" */");
    out
}

fn google_template(element: &CodeElement) -> String {
    let mut out = format!("Describe what `{}` does.\n", element.name);

    if !element.parameters.is_empty() {
        out.push_str("\nArgs:\n");
        for param in &element.parameters {
            match (&param.declared_type, param.required) {
                (Some(ty), true) => {
                    out.push_str(&format!("    {} ({}): Describe {}.\n", param.name, ty, param.name))
                }
                (Some(ty), false) => out.push_str(&format!(
                    "    {} ({}, optional): Describe {}.\n",
                    param.name, ty, param.name
                )),
                (None, true) => {
                    out.push_str(&format!("    {}: Describe {}.\n", param.name, param.name))
                }
                (None, false) => out.push_str(&format!(
                    "    {} (optional): Describe {}.\n",
                    param.name, param.name
                )),
            }
        }
    }

    out.push_str("\nReturns:\n");
    match element.returns.as_ref().and_then(|r| r.declared_type.as_deref()) {
        Some(ty) => out.push_str(&format!("    {}: Describe the return value.\n", ty)),
        None => out.push_str("    Describe the return value.\n"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doccomment::parse_doc;
    use crate::extract::{ElementKind, Parameter, ReturnInfo, Span};

    fn element_with_params(params: Vec<Parameter>, returns: Option<ReturnInfo>) -> CodeElement {
        CodeElement {
            kind: ElementKind::Function,
            name: "add".to_string(),
            doc_comment: None,
            source_snippet: "function add(a, b) { return a + b; }".to_string(),
            span: Span {
                start_line: 1,
                end_line: 1,
            },
            file_path: "math.js".to_string(),
            parameters: params,
            returns,
        }
    }

    fn param(name: &str, declared_type: Option<&str>, required: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            declared_type: declared_type.map(|t| t.to_string()),
            description: None,
            required,
        }
    }

    #[test]
    fn test_jsdoc_template_round_trip() {
        let element = element_with_params(
            vec![param("a", Some("number"), true), param("b", None, false)],
            Some(ReturnInfo {
                declared_type: Some("number".to_string()),
                description: None,
            }),
        );

        let template = suggestion_template(&element, Dialect::Jsdoc);
        let block = parse_doc(&template, Dialect::Jsdoc);

        let names: Vec<&str> = block.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(block.params[0].required);
        assert!(!block.params[1].required);
        assert_eq!(block.returns.unwrap().type_name.as_deref(), Some("number"));
    }

    #[test]
    fn test_google_template_round_trip() {
        let element = element_with_params(
            vec![param("a", Some("int"), true), param("b", Some("int"), false)],
            Some(ReturnInfo {
                declared_type: Some("int".to_string()),
                description: None,
            }),
        );

        let template = suggestion_template(&element, Dialect::Google);
        let block = parse_doc(&template, Dialect::Google);

        let names: Vec<&str> = block.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!block.params[1].required);
        assert_eq!(block.returns.unwrap().type_name.as_deref(), Some("int"));
    }

    #[test]
    fn test_zero_parameter_template_has_no_entries() {
        let element = element_with_params(vec![], None);

        let jsdoc = suggestion_template(&element, Dialect::Jsdoc);
        assert!(!jsdoc.contains("@param"));
        assert!(parse_doc(&jsdoc, Dialect::Jsdoc).params.is_empty());

        let google = suggestion_template(&element, Dialect::Google);
        assert!(!google.contains("Args:"));
        assert!(parse_doc(&google, Dialect::Google).params.is_empty());
    }

    #[test]
    fn test_template_is_deterministic() {
        let element = element_with_params(vec![param("x", None, true)], None);
        assert_eq!(
            suggestion_template(&element, Dialect::Jsdoc),
            suggestion_template(&element, Dialect::Jsdoc)
        );
    }
}
