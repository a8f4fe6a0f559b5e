//! Generator module - turns resolved posts into the public site

mod assets;
mod route;

pub use assets::{
    copy_static_assets, prune_stale, publish_linked, CopyImageProcessor, ImageProcessor,
};
pub use route::{Page, PageBody, Route, RouteTable};

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::content::{Post, Posts};
use crate::templates::{PostListItem, PostView, TemplateRenderer};
use crate::Blog;

/// Title of the index page
pub const INDEX_TITLE: &str = "All posts";
/// Title of the about page
pub const ABOUT_TITLE: &str = "About";

/// What a generation run wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages: usize,
    pub static_assets: usize,
    pub linked_assets: usize,
    /// Files left over from earlier runs that were deleted
    pub removed: usize,
}

/// Static site generator using the embedded templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    images: Box<dyn ImageProcessor>,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            images: Box::new(CopyImageProcessor),
        })
    }

    /// Replace the image processor used for linked images
    pub fn with_image_processor(mut self, images: Box<dyn ImageProcessor>) -> Self {
        self.images = images;
        self
    }

    /// Generate the entire site.
    ///
    /// The public directory ends up holding exactly this run's output:
    /// anything an earlier run wrote that is no longer produced is deleted.
    pub fn generate(&self, posts: &Posts) -> Result<GenerateReport> {
        let public_dir = &self.blog.public_dir;
        for source in [&self.blog.content_dir, &self.blog.assets_dir] {
            if source.starts_with(public_dir) {
                anyhow::bail!(
                    "Public directory {:?} contains the source directory {:?}",
                    public_dir,
                    source
                );
            }
        }
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut written: BTreeSet<PathBuf> = BTreeSet::new();
        let static_assets = copy_static_assets(&self.blog.assets_dir, public_dir)?;
        let mut report = GenerateReport {
            static_assets: static_assets.len(),
            ..Default::default()
        };
        written.extend(static_assets);

        let table = build_route_table(&self.blog, posts)?;
        for page in table.pages() {
            let html = self.renderer.render(page, &self.blog.config.site)?;
            let output_path = public_dir.join(page.route.output_file());

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)
                .with_context(|| format!("Failed to write {:?}", output_path))?;

            tracing::debug!("Generated: {}", page.route.path());
            written.insert(output_path);
            report.pages += 1;
        }

        for post in posts.iter() {
            for asset in &post.linked_assets {
                written.insert(publish_linked(asset, public_dir, self.images.as_ref())?);
                report.linked_assets += 1;
            }
        }

        report.removed = prune_stale(public_dir, &written)?;
        if report.removed > 0 {
            tracing::info!("Removed {} stale files", report.removed);
        }

        Ok(report)
    }
}

/// Bind every route to the data its template needs
pub fn build_route_table(blog: &Blog, posts: &Posts) -> Result<RouteTable> {
    let config = &blog.config;
    let tz = config.tz();
    let mut table = RouteTable::new();

    table.insert(Page {
        route: Route::Index,
        title: INDEX_TITLE.to_string(),
        description: config.site.description.clone(),
        body: PageBody::Index {
            posts: posts
                .all_sorted_by_date_desc()
                .iter()
                .map(|p| PostListItem {
                    title: p.title.clone(),
                    path: p.path(),
                    date: p.formatted_date(&config.date_format, &tz),
                })
                .collect(),
        },
    })?;

    table.insert(Page {
        route: Route::About,
        title: ABOUT_TITLE.to_string(),
        description: config.site.description.clone(),
        body: PageBody::About {
            items: config.about.clone(),
        },
    })?;

    for post in posts.iter() {
        table.insert(post_page(post, &config.date_format, &tz))?;
    }

    Ok(table)
}

fn post_page(post: &Post, date_format: &str, tz: &chrono_tz::Tz) -> Page {
    Page {
        route: Route::Post(post.slug.clone()),
        title: post.title.clone(),
        description: post.summary().to_string(),
        body: PageBody::Post(PostView {
            title: post.title.clone(),
            date: post.formatted_date(date_format, tz),
            html: post.html.clone(),
        }),
    }
}
