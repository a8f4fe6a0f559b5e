//! Post model

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::transform::LinkedAsset;

/// A resolved blog post, ready to be queried and rendered
#[derive(Debug, Clone)]
pub struct Post {
    /// URL slug, unique across the site
    pub slug: String,

    /// Post title (front-matter title, else the slug)
    pub title: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Description from front-matter
    pub description: Option<String>,

    /// Plain-text excerpt
    pub excerpt: String,

    /// Excerpt with inline markup, always well-formed
    pub excerpt_html: String,

    /// Rendered HTML content
    pub html: String,

    /// Source file path (relative to the content root)
    pub source: PathBuf,

    /// Files the post links to
    pub linked_assets: Vec<LinkedAsset>,

    /// Custom front-matter fields
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Post {
    /// Route path of the post page
    pub fn path(&self) -> String {
        format!("/{}/", self.slug)
    }

    /// Description, falling back to the derived excerpt
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.excerpt)
    }

    /// Format the date in the site's timezone
    pub fn formatted_date<Tz: TimeZone>(&self, format: &str, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.date.with_timezone(tz).format(format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap(),
            description: None,
            excerpt: "Derived".to_string(),
            excerpt_html: "<p>Derived</p>".to_string(),
            html: "<p>Derived</p>".to_string(),
            source: PathBuf::from("hello.md"),
            linked_assets: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_fallback() {
        let mut p = post();
        assert_eq!(p.summary(), "Derived");
        p.description = Some("  ".to_string());
        assert_eq!(p.summary(), "Derived");
        p.description = Some("Explicit".to_string());
        assert_eq!(p.summary(), "Explicit");
    }

    #[test]
    fn test_formatted_date_uses_timezone() {
        let p = post();
        assert_eq!(p.formatted_date("%B %d, %Y", &Utc), "March 01, 2024");
        assert_eq!(
            p.formatted_date("%Y-%m-%d", &chrono_tz::Europe::Lisbon),
            "2024-03-01"
        );
        assert_eq!(
            p.formatted_date("%Y-%m-%d", &chrono_tz::Asia::Tokyo),
            "2024-03-02"
        );
    }

    #[test]
    fn test_path() {
        assert_eq!(post().path(), "/hello/");
    }
}
