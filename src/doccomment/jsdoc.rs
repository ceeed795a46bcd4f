//! JSDoc dialect parser
//!
//! Strips comment markers per line, accumulates pre-tag lines into the
//! description, and parses `@param` / `@returns` tags into typed records.
//! Unrecognized `@`-tags are skipped without error.

use super::{DocBlock, DocParam, DocReturn};
use once_cell::sync::Lazy;
use regex::Regex;

static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@param\s+(?:\{([^}]*)\}\s*)?(\[?[\w$.]+\]?)\s*(?:-\s*)?(.*)$").unwrap()
});

static RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@returns?\b\s*(?:\{([^}]*)\}\s*)?(.*)$").unwrap());

/// Where continuation lines are appended
enum Target {
    Description,
    Param(usize),
    Returns,
    Skip,
}

pub(super) fn parse(text: &str) -> DocBlock {
    let mut block = DocBlock::default();
    let mut target = Target::Description;
    let mut description_lines: Vec<String> = Vec::new();

    for line in text.lines().map(clean_line) {
        if line.starts_with('@') {
            if let Some(caps) = PARAM_RE.captures(&line) {
                let type_token = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|t| !t.is_empty());

                let mut name = caps[2].to_string();
                let mut required = true;

                // `[name]` and `{Type=}` both mark an optional parameter
                if name.starts_with('[') && name.ends_with(']') {
                    name = name[1..name.len() - 1].to_string();
                    required = false;
                }
                if type_token.as_deref().is_some_and(|t| t.contains('=')) {
                    required = false;
                }

                let type_name =
                    type_token.map(|t| t.trim_end_matches('=').trim().to_string());

                block.params.push(DocParam {
                    name,
                    type_name,
                    description: caps[3].trim().to_string(),
                    required,
                });
                target = Target::Param(block.params.len() - 1);
            } else if let Some(caps) = RETURN_RE.captures(&line) {
                let type_name = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|t| !t.is_empty());
                block.returns = Some(DocReturn {
                    type_name,
                    description: caps[2].trim().to_string(),
                });
                target = Target::Returns;
            } else {
                target = Target::Skip;
            }
        } else {
            match target {
                Target::Description => description_lines.push(line),
                Target::Param(i) => append_line(&mut block.params[i].description, &line),
                Target::Returns => {
                    if let Some(ref mut ret) = block.returns {
                        append_line(&mut ret.description, &line);
                    }
                }
                Target::Skip => {}
            }
        }
    }

    block.description = description_lines.join("\n").trim().to_string();
    block
}

/// Strip `/**`, `*/` and leading `*` markers from one comment line
fn clean_line(raw: &str) -> String {
    let mut line = raw.trim();
    if let Some(rest) = line.strip_prefix("/**") {
        line = rest.trim_start();
    } else if let Some(rest) = line.strip_prefix("/*") {
        line = rest.trim_start();
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest.trim_end();
    }
    if let Some(rest) = line.strip_prefix('*') {
        line = rest.strip_prefix(' ').unwrap_or(rest);
    }
    line.to_string()
}

fn append_line(target: &mut String, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}
