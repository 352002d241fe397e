//! Page build command.

use std::path::{Path, PathBuf};

use clap::Args;
use mkpage::FsSource;
use mkpage_config::{PageConfig, PageSettings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for building a page.
#[derive(Args, Debug)]
pub(crate) struct PageArgs {
    /// Markdown document to wrap (default: read stdin).
    input: Option<PathBuf>,

    /// Write the page to this file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mkpage.toml).
    #[arg(short, long, env = "MKPAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Document title.
    #[arg(short, long)]
    title: Option<String>,

    /// Language attribute for the html element.
    #[arg(long)]
    lang: Option<String>,

    /// Document character set.
    #[arg(long)]
    charset: Option<String>,

    /// Stylesheet URL (repeatable).
    #[arg(long)]
    style: Vec<String>,

    /// Script URL in the head (repeatable).
    #[arg(long)]
    script: Vec<String>,

    /// Stylesheet file to inline.
    #[arg(long)]
    css: Option<PathBuf>,

    /// Script file to inline.
    #[arg(long)]
    javascript: Option<PathBuf>,

    /// Favicon URL.
    #[arg(long)]
    favicon: Option<String>,

    /// Media query for stylesheet links.
    #[arg(long)]
    media: Option<String>,

    /// Add the async attribute to script elements.
    #[arg(long = "async")]
    async_scripts: bool,

    /// Container element wrapped around the document.
    #[arg(short, long)]
    element: Option<String>,

    /// Script URL before the end of the body (repeatable).
    #[arg(long)]
    app: Vec<String>,

    /// File included at the start of the body (repeatable).
    #[arg(long)]
    header: Vec<PathBuf>,

    /// File included at the end of the body (repeatable).
    #[arg(long)]
    footer: Vec<PathBuf>,

    /// Parse header and footer files as markdown.
    #[arg(short, long)]
    markdown: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl PageArgs {
    /// Build the page and write it out.
    ///
    /// The output is written only once the whole page has been built.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let settings = self.settings();
        let config = PageConfig::load(self.config.as_deref(), Some(&settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(self.input.as_deref()).await?;
        let html = mkpage::render_page(config, FsSource, &markdown).await?;

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, html).await?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(html.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }

    /// Settings overriding the configuration file.
    fn settings(&self) -> PageSettings {
        PageSettings {
            title: self.title.clone(),
            lang: self.lang.clone(),
            charset: self.charset.clone(),
            style: self.style.clone(),
            script: self.script.clone(),
            css: self.css.clone(),
            javascript: self.javascript.clone(),
            favicon: self.favicon.clone(),
            media: self.media.clone(),
            async_scripts: self.async_scripts.then_some(true),
            element: self.element.clone(),
            app: self.app.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
            markdown: self.markdown.then_some(true),
        }
    }
}

async fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut markdown = String::new();
            tokio::io::stdin().read_to_string(&mut markdown).await?;
            Ok(markdown)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> PageArgs {
        Cli::try_parse_from(std::iter::once("mkpage").chain(args.iter().copied()))
            .unwrap()
            .page
    }

    fn run(args: PageArgs) -> Result<(), CliError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(args.execute())
    }

    #[test]
    fn test_settings_from_flags() {
        let args = parse(&[
            "--title",
            "Notes",
            "--style",
            "a.css",
            "--style",
            "b.css",
            "--async",
            "--header",
            "header.md",
            "-m",
        ]);
        let settings = args.settings();

        assert_eq!(settings.title.as_deref(), Some("Notes"));
        assert_eq!(settings.style, vec!["a.css", "b.css"]);
        assert_eq!(settings.async_scripts, Some(true));
        assert_eq!(settings.header, vec![PathBuf::from("header.md")]);
        assert_eq!(settings.markdown, Some(true));
        assert_eq!(settings.element, None);
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let settings = parse(&[]).settings();
        assert_eq!(settings.async_scripts, None);
        assert_eq!(settings.markdown, None);
        assert!(settings.app.is_empty());
    }

    #[test]
    fn test_execute_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.md");
        let output = dir.path().join("page.html");
        let config = dir.path().join("mkpage.toml");
        std::fs::write(&input, "# Title\n").unwrap();
        std::fs::write(&config, "title = \"From config\"\n").unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--element",
            "main",
        ]);
        run(args).unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<!doctype html>\n"));
        assert!(html.contains("<title>From config</title>"));
        assert!(html.contains("<main>\n<h1>Title</h1>\n</main>\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_execute_missing_include_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.md");
        let output = dir.path().join("page.html");
        let config = dir.path().join("mkpage.toml");
        std::fs::write(&input, "text\n").unwrap();
        std::fs::write(&config, "footer = \"non-existent.md\"\n").unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ]);
        let err = run(args).unwrap_err();

        assert!(matches!(err, CliError::Page(ref e) if e.is_not_found()));
        assert!(!output.exists());
    }
}
