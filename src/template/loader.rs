//! Template loader module.
//!
//! Reads `*.html` templates from a directory tree. A file at
//! `partials/footer.html` is registered as `partials/footer`.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Result, TemplateEngine, TemplateError};

const TEMPLATE_EXTENSION: &str = "html";

/// Loads templates from disk.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    base_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new template loader rooted at `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    /// Read the raw source of a template.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.template_path(name);

        if !path.is_file() {
            return Err(TemplateError::NotFound(format!(
                "Template '{name}' not found at {path:?}"
            )));
        }

        Ok(fs::read_to_string(&path)?)
    }

    /// List available template names, sorted.
    pub fn list_templates(&self) -> Result<Vec<String>> {
        if !self.base_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        collect_templates(&self.base_path, "", &mut templates)?;
        templates.sort();
        Ok(templates)
    }

    /// Check if a template exists.
    pub fn has_template(&self, name: &str) -> bool {
        self.template_path(name).is_file()
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Parse every template under the base path into a new engine.
    ///
    /// Fails on the first unreadable or unparsable template.
    pub fn load_engine(&self) -> Result<TemplateEngine> {
        let mut engine = TemplateEngine::new();

        for name in self.list_templates()? {
            let source = self.load(&name)?;
            engine.load(name.as_str(), &source).map_err(|e| match e {
                TemplateError::Parse(msg) => TemplateError::Parse(format!("{name}: {msg}")),
                other => other,
            })?;
        }

        tracing::debug!(
            path = %self.base_path.display(),
            count = engine.template_names().len(),
            "Templates loaded"
        );

        Ok(engine)
    }
}

fn collect_templates(dir: &Path, prefix: &str, templates: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        if path.is_dir() {
            let nested = if prefix.is_empty() {
                file_name
            } else {
                format!("{prefix}/{file_name}")
            };
            collect_templates(&path, &nested, templates)?;
        } else if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let name = if prefix.is_empty() {
                stem
            } else {
                format!("{prefix}/{stem}")
            };
            templates.push(name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18n;
    use crate::template::TemplateContext;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_templates(dir: &Path) {
        fs::write(dir.join("index.html"), "<h1>{{name}}</h1>\n").unwrap();
        fs::write(dir.join("notes.txt"), "not a template").unwrap();

        let partials = dir.join("partials");
        fs::create_dir_all(&partials).unwrap();
        fs::write(partials.join("footer.html"), "<footer>{{year}}</footer>").unwrap();
    }

    #[test]
    fn test_loader_new() {
        let loader = TemplateLoader::new("/tmp/templates");
        assert_eq!(loader.base_path(), Path::new("/tmp/templates"));
    }

    #[test]
    fn test_load() {
        let temp_dir = TempDir::new().unwrap();
        create_test_templates(temp_dir.path());

        let loader = TemplateLoader::new(temp_dir.path());
        assert_eq!(loader.load("index").unwrap(), "<h1>{{name}}</h1>\n");
        assert_eq!(
            loader.load("partials/footer").unwrap(),
            "<footer>{{year}}</footer>"
        );
    }

    #[test]
    fn test_load_not_found() {
        let temp_dir = TempDir::new().unwrap();
        create_test_templates(temp_dir.path());

        let loader = TemplateLoader::new(temp_dir.path());
        assert!(matches!(
            loader.load("missing"),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(loader.load("notes"), Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_list_templates() {
        let temp_dir = TempDir::new().unwrap();
        create_test_templates(temp_dir.path());

        let loader = TemplateLoader::new(temp_dir.path());
        assert_eq!(
            loader.list_templates().unwrap(),
            vec!["index".to_string(), "partials/footer".to_string()]
        );
    }

    #[test]
    fn test_list_templates_missing_dir() {
        let loader = TemplateLoader::new("/nonexistent/folio/templates");
        assert!(loader.list_templates().unwrap().is_empty());
    }

    #[test]
    fn test_has_template() {
        let temp_dir = TempDir::new().unwrap();
        create_test_templates(temp_dir.path());

        let loader = TemplateLoader::new(temp_dir.path());
        assert!(loader.has_template("index"));
        assert!(loader.has_template("partials/footer"));
        assert!(!loader.has_template("notes"));
    }

    #[test]
    fn test_load_engine() {
        let temp_dir = TempDir::new().unwrap();
        create_test_templates(temp_dir.path());

        let engine = TemplateLoader::new(temp_dir.path()).load_engine().unwrap();
        assert_eq!(engine.template_names(), vec!["index", "partials/footer"]);

        let mut context = TemplateContext::new(Arc::new(I18n::empty("en")));
        context.set("name", "Jane");
        assert_eq!(engine.render("index", &context).unwrap(), "<h1>Jane</h1>\n");
    }

    #[test]
    fn test_load_engine_reports_broken_template() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.html"), "{{#if x}}open").unwrap();

        let result = TemplateLoader::new(temp_dir.path()).load_engine();
        match result {
            Err(TemplateError::Parse(msg)) => assert!(msg.starts_with("broken: ")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
