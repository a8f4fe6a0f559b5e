//! statusblog: a personal blog generator with an embedded theme
//!
//! Markdown posts are scanned from the content directory, resolved into
//! typed posts and rendered through Tera templates into a static site.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentStore, MarkdownRenderer, Pipeline, Posts, Resolver};
use error::Diagnostic;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub content_dir: PathBuf,
    /// Files copied verbatim into the output
    pub assets_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

/// Everything the resolver produced for one run
#[derive(Debug)]
pub struct Site {
    pub posts: Posts,
    /// Documents left out of the site
    pub diagnostics: Vec<Diagnostic>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::from_config(base_dir, config))
    }

    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            content_dir: base_dir.join(&config.content_dir),
            assets_dir: base_dir.join(&config.assets_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        }
    }

    /// Scan and resolve all content.
    ///
    /// Slug problems fail the whole run; broken documents come back as
    /// diagnostics.
    pub fn load(&self) -> Result<Site> {
        let (store, mut diagnostics) = ContentStore::scan(&self.content_dir, &self.config.ignore)?;

        let renderer = MarkdownRenderer::with_options(
            &self.config.highlight.theme,
            self.config.highlight.line_number,
        )?;
        let pipeline = Pipeline::from_config(&self.config);
        let resolver = Resolver::new(
            &renderer,
            &pipeline,
            self.config.tz(),
            self.config.excerpt_length,
        );

        let resolution = resolver.resolve(&store)?;
        diagnostics.extend(resolution.diagnostics);

        Ok(Site {
            posts: resolution.posts,
            diagnostics,
        })
    }

    /// Generate the static site
    pub fn generate(&self, strict: bool) -> Result<generator::GenerateReport> {
        commands::generate::run(self, strict)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}
