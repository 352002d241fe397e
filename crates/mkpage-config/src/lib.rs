//! Page configuration for mkpage.
//!
//! Parses `mkpage.toml` files with serde and provides auto-discovery of the
//! config file in parent directories.
//!
//! Command line overrides can be applied during load via [`PageSettings`].
//!
//! ## Example
//!
//! ```toml
//! title = "Release notes"
//! style = ["/css/site.css"]
//! css = "inline.css"
//! header = "header.md"
//! markdown = true
//! element = "article"
//!
//! [meta]
//! description = "What changed"
//!
//! [attr]
//! class = "content"
//! ```

mod map;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

pub use map::{AttrValue, Attributes, MetaPairs, OrderedMap};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mkpage.toml";

/// Settings that override configuration file values.
///
/// Scalar options replace the loaded value when set; list options replace
/// the loaded list when non-empty.
#[derive(Debug, Default)]
pub struct PageSettings {
    pub title: Option<String>,
    pub lang: Option<String>,
    pub charset: Option<String>,
    pub style: Vec<String>,
    pub script: Vec<String>,
    pub css: Option<PathBuf>,
    pub javascript: Option<PathBuf>,
    pub favicon: Option<String>,
    pub media: Option<String>,
    pub async_scripts: Option<bool>,
    pub element: Option<String>,
    pub app: Vec<String>,
    pub header: Vec<PathBuf>,
    pub footer: Vec<PathBuf>,
    pub markdown: Option<bool>,
}

/// Options for wrapping a document in an HTML page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Document type declaration.
    pub doctype: String,
    /// Value of the `lang` attribute on the `html` element.
    pub lang: String,
    /// Document character set.
    pub charset: String,
    /// Document title.
    pub title: Option<String>,
    /// Stylesheet URLs, one `link` element each.
    pub style: Vec<String>,
    /// Script URLs, one `script` element each in the head.
    pub script: Vec<String>,
    /// Stylesheet file whose contents are inlined in a `style` element.
    pub css: Option<PathBuf>,
    /// Script file whose contents are inlined in a `script` element.
    pub javascript: Option<PathBuf>,
    /// Favicon URL.
    pub favicon: Option<String>,
    /// Media query for stylesheet links.
    pub media: Option<String>,
    /// Add the `async` attribute to every script element.
    #[serde(rename = "async")]
    pub async_scripts: bool,
    /// Attributes for the `html` element.
    #[serde(rename = "html")]
    pub html_attrs: Attributes,
    /// `meta` name/content pairs.
    pub meta: MetaPairs,
    /// `meta` http-equiv/content pairs.
    pub equiv: MetaPairs,
    /// Attributes for the `body` element.
    #[serde(rename = "body")]
    pub body_attrs: Attributes,
    /// Container element wrapped around the document content.
    pub element: Option<String>,
    /// Attributes for the container element.
    pub attr: Attributes,
    /// Script URLs placed just before the end of the body.
    pub app: Vec<String>,
    /// Files included at the start of the body.
    #[serde(deserialize_with = "one_or_many")]
    pub header: Vec<PathBuf>,
    /// Files included at the end of the body.
    #[serde(deserialize_with = "one_or_many")]
    pub footer: Vec<PathBuf>,
    /// Parse header and footer files as markdown instead of raw HTML.
    pub markdown: bool,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            doctype: "<!doctype html>".to_owned(),
            lang: "en-us".to_owned(),
            charset: "utf-8".to_owned(),
            title: None,
            style: Vec::new(),
            script: Vec::new(),
            css: None,
            javascript: None,
            favicon: None,
            media: None,
            async_scripts: false,
            html_attrs: Attributes::new(),
            meta: MetaPairs::new(),
            equiv: MetaPairs::new(),
            body_attrs: Attributes::new(),
            element: None,
            attr: Attributes::new(),
            app: Vec::new(),
            header: Vec::new(),
            footer: Vec::new(),
            markdown: false,
            config_path: None,
        }
    }
}

/// Accept either a single path or a list of paths.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a tag name made of ASCII alphanumerics and hyphens, starting with a letter.
fn require_tag_name(name: &str, field: &str) -> Result<(), ConfigError> {
    let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} is not a valid element name: {name:?}"
        )));
    }
    Ok(())
}

/// Require map keys usable as attribute names without escaping.
fn require_attribute_names<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    field: &str,
) -> Result<(), ConfigError> {
    for key in keys {
        let invalid = key.is_empty()
            || key
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '/'));
        if invalid {
            return Err(ConfigError::Validation(format!(
                "{field} contains an invalid attribute name: {key:?}"
            )));
        }
    }
    Ok(())
}

impl PageConfig {
    /// Load configuration from file with optional settings overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mkpage.toml` in current directory and parents.
    /// Settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        settings: Option<&PageSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = settings {
            config.apply_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply override settings to the configuration.
    pub fn apply_settings(&mut self, settings: &PageSettings) {
        fn replace<T: Clone>(target: &mut T, value: Option<&T>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        fn replace_list<T: Clone>(target: &mut Vec<T>, values: &[T]) {
            if !values.is_empty() {
                *target = values.to_vec();
            }
        }

        if settings.title.is_some() {
            self.title.clone_from(&settings.title);
        }
        replace(&mut self.lang, settings.lang.as_ref());
        replace(&mut self.charset, settings.charset.as_ref());
        replace_list(&mut self.style, &settings.style);
        replace_list(&mut self.script, &settings.script);
        if settings.css.is_some() {
            self.css.clone_from(&settings.css);
        }
        if settings.javascript.is_some() {
            self.javascript.clone_from(&settings.javascript);
        }
        if settings.favicon.is_some() {
            self.favicon.clone_from(&settings.favicon);
        }
        if settings.media.is_some() {
            self.media.clone_from(&settings.media);
        }
        replace(&mut self.async_scripts, settings.async_scripts.as_ref());
        if settings.element.is_some() {
            self.element.clone_from(&settings.element);
        }
        replace_list(&mut self.app, &settings.app);
        replace_list(&mut self.header, &settings.header);
        replace_list(&mut self.footer, &settings.footer);
        replace(&mut self.markdown, settings.markdown.as_ref());
    }

    /// Return the configuration with `lang` written into the `html` attributes.
    ///
    /// An existing `lang` attribute keeps its position and takes the
    /// configured value; otherwise it is appended.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        let lang = AttrValue::Text(self.lang.clone());
        self.html_attrs.insert("lang", lang);
        self
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.doctype, "doctype")?;
        require_non_empty(&self.charset, "charset")?;
        if let Some(element) = &self.element {
            require_tag_name(element, "element")?;
        }
        require_attribute_names(self.html_attrs.keys(), "html")?;
        require_attribute_names(self.body_attrs.keys(), "body")?;
        require_attribute_names(self.attr.keys(), "attr")?;
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve relative include paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = config_dir.join(&*path);
            }
        };

        self.css.iter_mut().for_each(resolve);
        self.javascript.iter_mut().for_each(resolve);
        self.header.iter_mut().for_each(resolve);
        self.footer.iter_mut().for_each(resolve);
    }
}
