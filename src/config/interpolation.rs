//! Environment variable interpolation for configuration values.
//!
//! String values in a resolved configuration may reference environment
//! variables (including ones injected from a `.env` file) using `${NAME}`.
//!
//! # Syntax
//!
//! - `${NAME}` - replaced with the value of `NAME` when it is set
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! Only names shaped like environment variables (`[A-Za-z_][A-Za-z0-9_]*`)
//! are references. Anything else, such as a JavaScript template literal in
//! `banner.js`, is literal text. References to unset variables are kept
//! verbatim.
//!
//! # Example
//!
//! ```json
//! { "define": { "API_URL": "\"${API_URL}\"" } }
//! ```

use serde_json::Value;

use crate::config::schema::ResolvedConfig;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Whether `name` can be an environment variable reference.
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Parse a string containing `${NAME}` references.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(escaped) = tail.strip_prefix("$${") {
            // $${...} -> literal ${...}
            literal.push_str("${");
            rest = escaped;
            continue;
        }

        let Some(body) = tail.strip_prefix("${") else {
            literal.push('$');
            rest = &tail[1..];
            continue;
        };

        match body.find('}') {
            Some(close) if is_variable_name(&body[..close]) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(body[..close].to_string()));
                rest = &body[close + 1..];
            }
            _ => {
                literal.push_str("${");
                rest = body;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// Check if a string contains any interpolation.
pub fn has_interpolation(input: &str) -> bool {
    parse_interpolation(input)
        .iter()
        .any(|seg| matches!(seg, Segment::Variable(_)))
}

/// Expand all variables in a string.
///
/// Unset variables are left as `${NAME}`.
pub fn expand_string(input: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => match lookup(&name) {
                Some(value) => result.push_str(&value),
                None => {
                    tracing::debug!("${{{}}} is not set, keeping it verbatim", name);
                    result.push_str("${");
                    result.push_str(&name);
                    result.push('}');
                }
            },
        }
    }

    result
}

/// Expand variables in every string value of a document, recursively.
///
/// Keys are left untouched.
pub fn expand_value(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
    match value {
        Value::String(text) if text.contains('$') => {
            *text = expand_string(text, lookup);
        }
        Value::Array(items) => {
            for item in items {
                expand_value(item, lookup);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                expand_value(item, lookup);
            }
        }
        _ => {}
    }
}

/// Expand variables in every option of a resolved configuration.
///
/// Runs after environment resolution, so overlays that were not selected
/// are never looked at.
pub fn expand_config(config: &mut ResolvedConfig, lookup: &dyn Fn(&str) -> Option<String>) {
    for (_, value) in config.as_map_mut().iter_mut() {
        expand_value(value, lookup);
    }
}

/// Look up a variable in the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn parse_literal_only() {
        let result = parse_interpolation("hello world");
        assert_eq!(result, vec![Segment::Literal("hello world".to_string())]);
    }

    #[test]
    fn parse_variable_with_surrounding_text() {
        let result = parse_interpolation("dist/${TARGET}/");
        assert_eq!(
            result,
            vec![
                Segment::Literal("dist/".to_string()),
                Segment::Variable("TARGET".to_string()),
                Segment::Literal("/".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_dollar_brace() {
        let result = parse_interpolation("$${NOT_INTERPOLATED}");
        assert_eq!(
            result,
            vec![Segment::Literal("${NOT_INTERPOLATED}".to_string())]
        );
    }

    #[test]
    fn parse_dollar_without_brace() {
        let result = parse_interpolation("price is $100");
        assert_eq!(result, vec![Segment::Literal("price is $100".to_string())]);
    }

    #[test]
    fn parse_adjacent_variables() {
        let result = parse_interpolation("${A}${B}");
        assert_eq!(
            result,
            vec![
                Segment::Variable("A".to_string()),
                Segment::Variable("B".to_string()),
            ]
        );
    }

    #[test]
    fn has_interpolation_detects_variables() {
        assert!(has_interpolation("v${VERSION}"));
        assert!(!has_interpolation("plain"));
        assert!(!has_interpolation("$${escaped}"));
    }

    #[test]
    fn parse_template_literal_is_literal() {
        let result = parse_interpolation("const v = `${pkg.version}`;");
        assert_eq!(
            result,
            vec![Segment::Literal("const v = `${pkg.version}`;".to_string())]
        );
    }

    #[test]
    fn parse_unclosed_reference_is_literal() {
        let result = parse_interpolation("dist/${TARGET");
        assert_eq!(result, vec![Segment::Literal("dist/${TARGET".to_string())]);
    }

    #[test]
    fn variable_names() {
        assert!(is_variable_name("API_URL"));
        assert!(is_variable_name("_private"));
        assert!(is_variable_name("npm_package_version"));
        assert!(!is_variable_name(""));
        assert!(!is_variable_name("1ST"));
        assert!(!is_variable_name("pkg.version"));
        assert!(!is_variable_name("a + b"));
    }

    #[test]
    fn expand_string_replaces_variables() {
        let lookup = lookup_from(&[("API_URL", "https://api.test")]);
        let result = expand_string("\"${API_URL}\"", &lookup);
        assert_eq!(result, "\"https://api.test\"");
    }

    #[test]
    fn expand_string_keeps_unset_variables() {
        let lookup = lookup_from(&[]);
        assert_eq!(expand_string("${MISSING}", &lookup), "${MISSING}");
    }

    #[test]
    fn expand_string_keeps_template_literals() {
        let lookup = lookup_from(&[("version", "9.9.9")]);
        let banner = "const v = `${pkg.version}`; const w = `${a + b}`;";
        assert_eq!(expand_string(banner, &lookup), banner);
    }

    #[test]
    fn expand_string_preserves_escaped() {
        let lookup = lookup_from(&[("KEEP", "no")]);
        let result = expand_string("$${KEEP}", &lookup);
        assert_eq!(result, "${KEEP}");
    }

    #[test]
    fn expand_value_walks_nested_strings() {
        let lookup = lookup_from(&[("OUT", "build"), ("MODE", "prod")]);
        let mut value = json!({
            "outdir": "${OUT}",
            "define": {"process.env.MODE": "\"${MODE}\""},
            "external": ["${MODE}-only", "react"],
            "minify": true,
            "${OUT}": "keys are not expanded"
        });

        expand_value(&mut value, &lookup);

        assert_eq!(value["outdir"], "build");
        assert_eq!(value["define"]["process.env.MODE"], "\"prod\"");
        assert_eq!(value["external"], json!(["prod-only", "react"]));
        assert_eq!(value["minify"], true);
        assert!(value.get("${OUT}").is_some());
    }

    #[test]
    fn env_lookup_reads_process_environment() {
        std::env::set_var("COSBY_INTERPOLATION_TEST", "yes");
        assert_eq!(
            env_lookup("COSBY_INTERPOLATION_TEST"),
            Some("yes".to_string())
        );
        std::env::remove_var("COSBY_INTERPOLATION_TEST");
    }
}
