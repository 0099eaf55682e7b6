//! Template engine for prompt generation

use crate::{Result, TablyError};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template engine wrapper
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        Self { handlebars }
    }

    /// Render a template with data
    pub fn render(
        &self,
        template: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| TablyError::template(e.to_string()))
    }

}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Analysis prompt sent to the gateway when a chat turn triggers data
/// analysis. `DATA_SUMMARY` is the rendered numeric summary; the
/// `Data Dictionary:` section only appears when a dictionary was uploaded.
/// Triple braces: summaries and dictionaries are plain text, not HTML.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the dataset below and provide insights:

{{#if DATA_DICTIONARY}}Data:
{{{DATA_SUMMARY}}}

Data Dictionary:
{{{DATA_DICTIONARY}}}{{else}}{{{DATA_SUMMARY}}}{{/if}}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_engine_creation() {
        let engine = TemplateEngine::new();
        let data = HashMap::new();

        let result = engine.render("Hello, World!", &data).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_template_with_variables() {
        let engine = TemplateEngine::new();
        let mut data = HashMap::new();
        data.insert(
            "name".to_string(),
            serde_json::Value::String("Alice".to_string()),
        );

        let result = engine.render("Hello, {{name}}!", &data).unwrap();
        assert_eq!(result, "Hello, Alice!");
    }

    #[test]
    fn test_analysis_template_without_dictionary() {
        let engine = TemplateEngine::new();
        let mut data = HashMap::new();
        data.insert(
            "DATA_SUMMARY".to_string(),
            serde_json::Value::String("col_summary".to_string()),
        );

        let result = engine.render(ANALYSIS_PROMPT_TEMPLATE, &data).unwrap();
        assert!(result.starts_with("Analyze the dataset below and provide insights:"));
        assert!(result.contains("col_summary"));
        assert!(!result.contains("Data Dictionary:"));
    }

    #[test]
    fn test_analysis_template_with_dictionary() {
        let engine = TemplateEngine::new();
        let mut data = HashMap::new();
        data.insert(
            "DATA_SUMMARY".to_string(),
            serde_json::Value::String("col_summary".to_string()),
        );
        data.insert(
            "DATA_DICTIONARY".to_string(),
            serde_json::Value::String("dict_contents".to_string()),
        );

        let result = engine.render(ANALYSIS_PROMPT_TEMPLATE, &data).unwrap();
        assert!(result.contains("Data:\ncol_summary"));
        assert!(result.contains("Data Dictionary:\ndict_contents"));
        let data_pos = result.find("Data:").unwrap();
        let dict_pos = result.find("Data Dictionary:").unwrap();
        assert!(data_pos < dict_pos);
    }

    #[test]
    fn test_plain_text_is_not_html_escaped() {
        let engine = TemplateEngine::new();
        let mut data = HashMap::new();
        data.insert(
            "DATA_SUMMARY".to_string(),
            serde_json::Value::String("a < b & c".to_string()),
        );

        let result = engine.render(ANALYSIS_PROMPT_TEMPLATE, &data).unwrap();
        assert!(result.contains("a < b & c"));
    }
}
