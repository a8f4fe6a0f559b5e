//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site metadata, handed to every template
    #[serde(flatten)]
    pub site: SiteMetadata,

    // Directory
    pub content_dir: String,
    pub assets_dir: String,
    pub public_dir: String,
    #[serde(default)]
    pub ignore: Vec<String>,

    // Writing
    pub timezone: String,
    pub date_format: String,
    pub excerpt_length: usize,
    pub strict: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub iframes: IframesConfig,

    // About page
    #[serde(default)]
    pub about: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMetadata::default(),

            content_dir: "content/blog".to_string(),
            assets_dir: "content/assets".to_string(),
            public_dir: "public".to_string(),
            ignore: Vec::new(),

            timezone: "UTC".to_string(),
            date_format: "%B %d, %Y".to_string(),
            excerpt_length: 160,
            strict: false,
            highlight: HighlightConfig::default(),
            images: ImagesConfig::default(),
            iframes: IframesConfig::default(),

            about: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                chrono_tz::UTC
            }
        }
    }
}

/// Site-wide metadata, read-only after load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMetadata {
    pub title: String,
    pub author: Author,
    pub description: String,
    pub site_url: String,
    pub social: Social,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            author: Author::default(),
            description: String::new(),
            site_url: "http://localhost:8000/".to_string(),
            social: Social::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub github: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Inline image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub max_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { max_width: 590 }
    }
}

/// Embedded iframe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IframesConfig {
    pub wrapper_style: String,
}

impl Default for IframesConfig {
    fn default() -> Self {
        Self {
            wrapper_style: "margin-bottom: 1.0725rem".to_string(),
        }
    }
}
