//! Theme engine
//!
//! Renders pages with Tera. The default theme is compiled into the binary;
//! a theme directory on disk (`<theme.path>/<theme.active>/`) may override
//! any of its templates or static files by using the same relative path.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tera::{Context as TeraContext, Tera, Value};

mod error;

pub use error::ThemeError;

/// Default theme, embedded at build time
#[derive(RustEmbed)]
#[folder = "themes/default/"]
struct DefaultTheme;

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
    /// On-disk directory of the active theme; may not exist
    theme_dir: PathBuf,
    active_theme: String,
}

impl ThemeEngine {
    /// Load the embedded default theme, then overlay `<themes_path>/<active>`
    /// if that directory exists.
    pub fn new(themes_path: &Path, active: &str) -> Result<Self> {
        let theme_dir = themes_path.join(active);

        let mut templates = embedded_templates()?;
        if theme_dir.is_dir() {
            let mut overrides = Vec::new();
            collect_templates_from_dir(&theme_dir, &theme_dir, &mut overrides)?;
            tracing::info!(
                "Loaded {} template(s) from theme '{}' at {:?}",
                overrides.len(),
                active,
                theme_dir
            );
            for (name, content) in overrides {
                templates.retain(|(existing, _)| existing != &name);
                templates.push((name, content));
            }
        } else if active != "default" {
            tracing::warn!(
                "Theme '{}' not found at {:?}, using the built-in default theme",
                active,
                theme_dir
            );
        }

        let mut tera = Tera::default();
        tera.register_filter("currency", currency_filter);
        // add_raw_templates resolves inheritance once all templates are in,
        // so the order of base and child templates does not matter.
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(error_chain(&e)))?;

        Ok(Self {
            tera,
            theme_dir,
            active_theme: active.to_string(),
        })
    }

    /// Render a template, reporting the full Tera error chain on failure
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::RenderError(format!("Failed to render '{}': {}", template, error_chain(&e)))
                .into()
        })
    }

    /// Minimal standalone HTML page, used when no template can be rendered
    pub fn simple_error_page(title: &str, message: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; max-width: 600px; margin: 50px auto; padding: 20px; }}
        h1 {{ color: #c0392b; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>{message}</p>
    <p><a href="/">Back to home</a></p>
</body>
</html>"#,
            title = tera::escape_html(title),
            message = tera::escape_html(message),
        )
    }

    /// Look up a static file of the active theme, falling back to the
    /// embedded default. `path` is relative to the theme's `static/` folder.
    pub fn static_file(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        let relative = sanitize_static_path(path)?;

        let on_disk = self.theme_dir.join("static").join(&relative);
        if on_disk.is_file() {
            match fs::read(&on_disk) {
                Ok(data) => return Some(Cow::Owned(data)),
                Err(e) => tracing::warn!("Failed to read static file {:?}: {}", on_disk, e),
            }
        }

        let embedded_path = format!("static/{}", relative.to_string_lossy().replace('\\', "/"));
        DefaultTheme::get(&embedded_path).map(|file| file.data)
    }

    pub fn active_theme(&self) -> &str {
        &self.active_theme
    }
}

fn embedded_templates() -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    for name in DefaultTheme::iter().filter(|n| n.ends_with(".html")) {
        let Some(file) = DefaultTheme::get(&name) else {
            continue;
        };
        let content = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("Embedded template is not UTF-8: {}", name))?;
        templates.push((name.into_owned(), content));
    }
    Ok(templates)
}

fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(current_path).map_err(ThemeError::from)? {
        let path = entry.map_err(ThemeError::from)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let relative = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError(format!("Template outside theme: {:?}", path)))?;
            let name = relative.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;
            templates.push((name, content));
        }
    }
    Ok(())
}

/// Reject absolute paths and `..` so a request cannot leave the static folder
fn sanitize_static_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let candidate = Path::new(trimmed);
    if candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(candidate.to_path_buf())
    } else {
        None
    }
}

/// `{{ listing.price | currency }}` renders whole dollars as `$1,250,000`
fn currency_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg(format!("currency expects an integer, got {}", value)))?;
    Ok(Value::String(format_currency(amount)))
}

pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}

#[cfg(test)]
mod tests;
