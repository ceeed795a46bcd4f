//! Google-style docstring parser
//!
//! Description is the text preceding the first recognized section header.
//! `Args:` lines are parsed as `name (type): description` or
//! `name: description`; `Returns:` as `Type: description` or a bare
//! description. Section scans stop at the next top-level header.

use super::{DocBlock, DocParam, DocReturn};
use once_cell::sync::Lazy;
use regex::Regex;

const SECTION_HEADERS: &[&str] = &[
    "Args:",
    "Arguments:",
    "Returns:",
    "Raises:",
    "Yields:",
    "Examples:",
    "Example:",
    "Attributes:",
    "Note:",
    "Notes:",
];

static ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\*{0,2}\w+)\s*(?:\(([^)]*)\))?\s*:\s*(.*)$").unwrap());

fn is_section_header(line: &str) -> bool {
    SECTION_HEADERS.contains(&line.trim())
}

pub(super) fn parse(text: &str) -> DocBlock {
    let mut block = DocBlock::default();
    let lines: Vec<&str> = text.lines().collect();

    let mut i = 0;
    let mut description_lines = Vec::new();
    while i < lines.len() && !is_section_header(lines[i]) {
        description_lines.push(lines[i]);
        i += 1;
    }
    block.description = description_lines.join("\n").trim().to_string();

    while i < lines.len() {
        let header = lines[i].trim();
        i += 1;
        let start = i;
        while i < lines.len() && !is_section_header(lines[i]) {
            i += 1;
        }
        let body = &lines[start..i];

        match header {
            "Args:" | "Arguments:" => parse_args(body, &mut block),
            "Returns:" => parse_returns(body, &mut block),
            _ => {}
        }
    }

    block
}

fn parse_args(body: &[&str], block: &mut DocBlock) {
    for line in body {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = ARG_RE.captures(line) {
            let name = caps[1].trim_start_matches('*').to_string();
            let (type_name, required) = match caps.get(2) {
                Some(m) => split_type_token(m.as_str()),
                None => (None, true),
            };
            block.params.push(DocParam {
                name,
                type_name,
                description: caps[3].trim().to_string(),
                required,
            });
        } else if let Some(last) = block.params.last_mut() {
            // continuation of the previous parameter's description
            if !last.description.is_empty() {
                last.description.push('\n');
            }
            last.description.push_str(line.trim());
        }
        // a line matching neither grammar nor continuation is dropped
    }
}

/// Split a parenthesized type token like `int, optional` into the type name
/// and the required flag
fn split_type_token(token: &str) -> (Option<String>, bool) {
    let mut required = true;
    let mut type_name = None;
    for part in token.split(',') {
        let part = part.trim();
        if part.eq_ignore_ascii_case("optional") {
            required = false;
        } else if !part.is_empty() && type_name.is_none() {
            type_name = Some(part.to_string());
        }
    }
    (type_name, required)
}

fn parse_returns(body: &[&str], block: &mut DocBlock) {
    let mut ret: Option<DocReturn> = None;

    for line in body {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match ret {
            None => {
                // `Type: description` when the prefix is a single bare token
                let parsed = match trimmed.split_once(':') {
                    Some((ty, desc)) if !ty.trim().is_empty() && !ty.trim().contains(' ') => {
                        DocReturn {
                            type_name: Some(ty.trim().to_string()),
                            description: desc.trim().to_string(),
                        }
                    }
                    _ => DocReturn {
                        type_name: None,
                        description: trimmed.to_string(),
                    },
                };
                ret = Some(parsed);
            }
            Some(ref mut r) => {
                if !r.description.is_empty() {
                    r.description.push('\n');
                }
                r.description.push_str(trimmed);
            }
        }
    }

    if ret.is_some() {
        block.returns = ret;
    }
}
