//! Placeholder substitution for source templates.

use crate::error::{CodegenError, CodegenResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Match {{variable_name}} or {{ variable_name }}
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"))
}

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string as a quoted, escaped TypeScript string literal.
    pub fn literal(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), string_literal(value));
        self
    }

    /// Insert a list of strings as a TypeScript array literal.
    pub fn literal_list(mut self, name: &str, values: &[String]) -> Self {
        self.values.insert(name.to_string(), array_literal(values));
        self
    }

    /// Insert already-formed source text verbatim.
    pub fn raw(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Encode `value` as a string literal. JSON string syntax is valid in
/// TypeScript, so the JSON encoder handles quotes, backslashes and control
/// characters.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Encode a list of strings as an array literal.
pub fn array_literal(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("[{}]", items.join(", "))
}

/// Substitute every placeholder in `template` in a single pass.
///
/// Substituted text is never rescanned, so values that happen to contain
/// placeholder syntax come through unchanged.
pub fn render(template: &str, context: &RenderContext) -> CodegenResult<String> {
    let mut missing: Vec<String> = Vec::new();

    let rendered = variable_pattern().replace_all(template, |caps: &Captures<'_>| {
        match context.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                if !missing.iter().any(|m| m == &caps[1]) {
                    missing.push(caps[1].to_string());
                }
                caps[0].to_string()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(CodegenError::MissingVariable(missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_render_substitutes_with_and_without_spaces() {
        let context = RenderContext::new().raw("a", "1").raw("b", "2");
        assert_eq!(render("{{a}} + {{ b }}", &context).unwrap(), "1 + 2");
    }

    #[test]
    fn test_render_reports_all_missing_once() {
        let context = RenderContext::new();
        let err = render("{{x}} {{y}} {{x}}", &context).unwrap_err();
        assert_eq!(err.to_string(), "missing template variables: x, y");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let context = RenderContext::new().raw("a", "{{b}}").raw("b", "nope");
        assert_eq!(render("{{a}}", &context).unwrap(), "{{b}}");
    }

    #[test]
    fn test_template_literals_are_left_alone() {
        let context = RenderContext::new();
        let ts = "`${TOOL} failed`; const o = { a: { b: 1 }};";
        assert_eq!(render(ts, &context).unwrap(), ts);
    }

    #[test_case("plain", r#""plain""# ; "plain")]
    #[test_case(r#"it's "quoted""#, r#""it's \"quoted\"""# ; "quotes")]
    #[test_case(r"C:\temp", r#""C:\\temp""# ; "backslash")]
    #[test_case("line\nbreak", r#""line\nbreak""# ; "newline")]
    fn test_string_literal(input: &str, expected: &str) {
        assert_eq!(string_literal(input), expected);
    }

    #[test]
    fn test_array_literal() {
        let values = vec!["pip".to_string(), "install".to_string()];
        assert_eq!(array_literal(&values), r#"["pip", "install"]"#);
        assert_eq!(array_literal(&[]), "[]");
    }
}
