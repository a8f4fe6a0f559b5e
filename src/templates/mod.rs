//! Built-in blog templates using the Tera template engine
//!
//! The layout, the three page templates and the bio partial are embedded
//! in the binary. Rendering is a pure function of the page data and the
//! site metadata: nothing time- or environment-dependent reaches a template.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteMetadata;
use crate::generator::{Page, PageBody};
use crate::helpers::{github_profile_url, html_escape};

/// Icons shipped in the assets directory, published at the site root
pub const ABOUT_ICON: &str = "/about-icon.svg";
pub const GITHUB_ICON: &str = "/github-icon.svg";
pub const BACK_ICON: &str = "/back-icon.svg";

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit through the `html_escape` filter; post bodies
        // are already HTML and go out untouched
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("about.html", include_str!("blog/about.html")),
            ("post.html", include_str!("blog/post.html")),
            (
                "partials/bio.html",
                include_str!("blog/partials/bio.html"),
            ),
        ])?;

        tera.register_filter("html_escape", html_escape_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render_template(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render one page inside the shared layout
    pub fn render(&self, page: &Page, site: &SiteMetadata) -> Result<String> {
        let mut context = layout_context(site);
        context.insert("page_title", &page.title);
        context.insert("description", &page.description);

        match &page.body {
            PageBody::Index { posts } => context.insert("posts", posts),
            PageBody::About { items } => context.insert("items", items),
            PageBody::Post(post) => context.insert("post", post),
        }

        self.render_template(page.route.template(), &context)
    }
}

/// Context shared by every page: site metadata and the bio links
fn layout_context(site: &SiteMetadata) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert(
        "bio",
        &BioData {
            about_path: "/about".to_string(),
            github_url: github_profile_url(&site.social.github),
        },
    );
    context.insert(
        "icons",
        &IconData {
            about: ABOUT_ICON,
            github: GITHUB_ICON,
            back: BACK_ICON,
        },
    );
    context
}

/// Tera filter: escape HTML text and attribute values
fn html_escape_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("html_escape", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct BioData {
    pub about_path: String,
    pub github_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconData {
    pub about: &'static str,
    pub github: &'static str,
    pub back: &'static str,
}

/// One row of the index listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostListItem {
    pub title: String,
    pub path: String,
    pub date: String,
}

/// Everything the post template shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub title: String,
    pub date: String,
    pub html: String,
}
