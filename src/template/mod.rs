//! HTML template engine for folio.
//!
//! A small Handlebars-style engine used to render the site pages.
//!
//! # Features
//!
//! - Variable expansion: `{{variable}}`, `{{user.name}}`
//! - Translation reference: `{{t "key"}}` or `{{t "key" name=value}}`
//! - Conditionals: `{{#if condition}}...{{else}}...{{/if}}`
//! - Inverse conditionals: `{{#unless condition}}...{{/unless}}`
//! - Loops: `{{#each items}}...{{/each}}`
//! - Escaping: `\{{` to output literal `{{`
//!
//! Everything interpolated into the output is HTML-escaped; only the
//! template's own text is emitted verbatim.
//!
//! # Example
//!
//! ```
//! use folio::template::{TemplateEngine, TemplateContext, Value};
//! use folio::i18n::I18n;
//! use std::sync::Arc;
//!
//! let mut engine = TemplateEngine::new();
//! engine.load("greeting", "<p>Hello, {{name}}!</p>").unwrap();
//!
//! let mut context = TemplateContext::new(Arc::new(I18n::empty("en")));
//! context.set("name", Value::string("<World>"));
//!
//! let html = engine.render("greeting", &context).unwrap();
//! assert_eq!(html, "<p>Hello, &lt;World&gt;!</p>");
//! ```

mod loader;
mod parser;
mod renderer;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::i18n::I18n;

pub use loader::TemplateLoader;
pub use parser::{Node, Parser};
pub use renderer::Renderer;

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Template-related errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Render error.
    #[error("Render error: {0}")]
    Render(String),

    /// Template file could not be read.
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A value that can be used in templates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// A numeric value.
    Number(i64),
    /// A boolean value.
    Bool(bool),
    /// A list of values.
    List(Vec<Value>),
    /// An object (key-value pairs).
    Object(HashMap<String, Value>),
    /// A null/empty value.
    Null,
}

impl Value {
    /// Convert the value to (unescaped) display text.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(_) | Value::Object(_) | Value::Null => String::new(),
        }
    }

    /// Check if the value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n != 0,
            Value::Bool(b) => *b,
            Value::List(l) => !l.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::Null => false,
        }
    }

    /// Get a nested value by dot-separated path.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;

        for part in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::List(list) => list.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Create a Value from a string.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create an object Value from `(key, value)` pairs.
    pub fn object<K, I>(items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Variables and translations available while rendering.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    variables: HashMap<String, Value>,
    i18n: Arc<I18n>,
}

impl TemplateContext {
    /// Create an empty context using the given translations.
    pub fn new(i18n: Arc<I18n>) -> Self {
        Self {
            variables: HashMap::new(),
            i18n,
        }
    }

    /// Set a variable in the context.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Get a variable, following dot paths into objects and lists.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.variables.get(name) {
            return Some(value);
        }

        let (root, rest) = name.split_once('.')?;
        self.variables.get(root)?.get_path(rest)
    }

    /// Translations used for `{{t ...}}`.
    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Create a child context that inherits all variables.
    pub fn child(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            i18n: Arc::clone(&self.i18n),
        }
    }
}

/// Parsed templates, keyed by name.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    templates: HashMap<String, Vec<Node>>,
}

impl TemplateEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a template.
    pub fn load(&mut self, name: impl Into<String>, content: &str) -> Result<()> {
        let nodes = Parser::new(content).parse()?;
        self.templates.insert(name.into(), nodes);
        Ok(())
    }

    /// Render a registered template.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let nodes = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        Renderer::new(context).render(nodes)
    }

    /// Render a template string without registering it.
    pub fn render_string(content: &str, context: &TemplateContext) -> Result<String> {
        let nodes = Parser::new(content).parse()?;
        Renderer::new(context).render(&nodes)
    }

    /// Check if a template is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Names of registered templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_context() -> TemplateContext {
        TemplateContext::new(Arc::new(I18n::empty("en")))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Привіт"), "Привіт");
    }

    #[test]
    fn test_value_to_display_string() {
        assert_eq!(Value::string("hello").to_display_string(), "hello");
        assert_eq!(Value::Number(42).to_display_string(), "42");
        assert_eq!(Value::Bool(false).to_display_string(), "false");
        assert_eq!(Value::List(vec![]).to_display_string(), "");
        assert_eq!(Value::Null.to_display_string(), "");
    }

    #[test]
    fn test_value_is_truthy() {
        assert!(Value::string("x").is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::Number(1).is_truthy());
        assert!(!Value::Number(0).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::List(vec![Value::Null]).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_value_get_path() {
        let value = Value::object([(
            "locale",
            Value::object([("code", Value::string("cs")), ("active", Value::Bool(true))]),
        )]);

        assert_eq!(value.get_path("locale.code"), Some(&Value::string("cs")));
        assert_eq!(value.get_path("locale.active"), Some(&Value::Bool(true)));
        assert_eq!(value.get_path("locale.missing"), None);

        let list: Value = vec!["a", "b"].into();
        assert_eq!(list.get_path("1"), Some(&Value::string("b")));
        assert_eq!(list.get_path("x"), None);
    }

    #[test]
    fn test_value_from_traits() {
        assert_eq!(Value::from("hi"), Value::string("hi"));
        assert_eq!(Value::from(7i32), Value::Number(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(
            Value::from(vec!["a"]),
            Value::List(vec![Value::string("a")])
        );
    }

    #[test]
    fn test_context_set_and_get_nested() {
        let mut context = create_context();
        context.set("name", "Jane");
        context.set("site", Value::object([("year", Value::Number(2026))]));

        assert_eq!(context.get("name"), Some(&Value::string("Jane")));
        assert_eq!(context.get("site.year"), Some(&Value::Number(2026)));
        assert_eq!(context.get("site.missing"), None);
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn test_context_child() {
        let mut context = create_context();
        context.set("parent", "p");

        let mut child = context.child();
        child.set("child", "c");

        assert_eq!(child.get("parent"), Some(&Value::string("p")));
        assert_eq!(context.get("child"), None);
    }

    #[test]
    fn test_engine_load_and_render() {
        let mut engine = TemplateEngine::new();
        engine.load("page", "<h1>{{title}}</h1>").unwrap();

        let mut context = create_context();
        context.set("title", "Tom & Jerry");

        assert_eq!(
            engine.render("page", &context).unwrap(),
            "<h1>Tom &amp; Jerry</h1>"
        );
    }

    #[test]
    fn test_engine_render_not_found() {
        let engine = TemplateEngine::new();
        let result = engine.render("missing", &create_context());
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_engine_load_parse_error() {
        let mut engine = TemplateEngine::new();
        let result = engine.load("broken", "{{#if open}}never closed");
        assert!(matches!(result, Err(TemplateError::Parse(_))));
        assert!(!engine.has_template("broken"));
    }

    #[test]
    fn test_engine_template_names() {
        let mut engine = TemplateEngine::new();
        engine.load("index", "").unwrap();
        engine.load("base", "").unwrap();

        assert_eq!(engine.template_names(), vec!["base", "index"]);
    }

    #[test]
    fn test_engine_render_string() {
        let mut context = create_context();
        context.set("x", 10i64);

        let result = TemplateEngine::render_string("x = {{x}}", &context).unwrap();
        assert_eq!(result, "x = 10");
    }
}
