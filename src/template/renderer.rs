//! Renders parsed nodes against a [`TemplateContext`].
//!
//! Output is written into a single buffer. Variables and translations are
//! HTML-escaped on the way in; template text is copied unchanged.

use super::parser::Node;
use super::{escape_html, Result, TemplateContext, TemplateError, Value};

/// Name bound to the current item in `{{#each}}` without `as`.
const DEFAULT_ITEM_NAME: &str = "this";

/// Template renderer.
pub struct Renderer<'a> {
    context: &'a TemplateContext,
}

impl<'a> Renderer<'a> {
    pub fn new(context: &'a TemplateContext) -> Self {
        Self { context }
    }

    /// Render a list of nodes to a string.
    pub fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut out = String::new();
        self.render_into(nodes, &mut out)?;
        Ok(out)
    }

    fn render_into(&self, nodes: &[Node], out: &mut String) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable(name) => {
                    // missing variables render as nothing
                    if let Some(value) = self.context.get(name) {
                        out.push_str(&escape_html(&value.to_display_string()));
                    }
                }
                Node::Translation { key, params } => {
                    out.push_str(&escape_html(&self.translate(key, params)));
                }
                Node::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    let branch = if self.truthy(condition) {
                        then_branch
                    } else {
                        else_branch
                    };
                    self.render_into(branch, out)?;
                }
                Node::Unless { condition, body } => {
                    if !self.truthy(condition) {
                        self.render_into(body, out)?;
                    }
                }
                Node::Each {
                    variable,
                    item_name,
                    body,
                } => self.render_each(variable, item_name.as_deref(), body, out)?,
            }
        }
        Ok(())
    }

    /// Look up a translation, substituting its parameters.
    ///
    /// A quoted parameter value is a literal; anything else names a variable.
    fn translate(&self, key: &str, params: &[(String, String)]) -> String {
        let i18n = self.context.i18n();
        if params.is_empty() {
            return i18n.t(key).to_string();
        }

        let values: Vec<String> = params
            .iter()
            .map(|(_, value)| match literal(value) {
                Some(text) => text.to_string(),
                None => self
                    .context
                    .get(value)
                    .map(Value::to_display_string)
                    .unwrap_or_default(),
            })
            .collect();

        let pairs: Vec<(&str, &str)> = params
            .iter()
            .zip(&values)
            .map(|((name, _), value)| (name.as_str(), value.as_str()))
            .collect();

        i18n.t_with(key, &pairs)
    }

    fn truthy(&self, name: &str) -> bool {
        self.context.get(name).is_some_and(Value::is_truthy)
    }

    fn render_each(
        &self,
        variable: &str,
        item_name: Option<&str>,
        body: &[Node],
        out: &mut String,
    ) -> Result<()> {
        let items = match self.context.get(variable) {
            None => return Ok(()),
            Some(Value::List(items)) => items,
            Some(_) => {
                return Err(TemplateError::Render(format!("'{variable}' is not a list")));
            }
        };

        let last = items.len().saturating_sub(1);
        for (index, item) in items.iter().enumerate() {
            let mut scope = self.context.child();

            // object fields are reachable without a prefix
            if let Value::Object(fields) = item {
                for (field, value) in fields {
                    scope.set(field.as_str(), value.clone());
                }
            }
            scope.set(item_name.unwrap_or(DEFAULT_ITEM_NAME), item.clone());
            scope.set("@index", Value::Number(index as i64));
            scope.set("@first", index == 0);
            scope.set("@last", index == last);

            Renderer::new(&scope).render_into(body, out)?;
        }
        Ok(())
    }
}

/// Inner text of a quoted literal.
fn literal(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}
