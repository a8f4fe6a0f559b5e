//! List site content

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::content::LinkedAsset;
use crate::error::Diagnostic;
use crate::generator::build_route_table;
use crate::helpers::absolute_url;
use crate::Blog;

#[derive(Debug, Serialize)]
struct PostEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: String,
    path: String,
    source: String,
    description: Option<&'a str>,
    excerpt: &'a str,
    excerpt_html: &'a str,
    linked_assets: &'a [LinkedAsset],
    extra: &'a BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Serialize)]
struct PostListing<'a> {
    posts: Vec<PostEntry<'a>>,
    skipped: &'a [Diagnostic],
}

#[derive(Debug, Serialize)]
struct RouteEntry {
    path: String,
    url: String,
    template: &'static str,
    output: String,
}

/// List resolved posts or the route table
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    print!("{}", render(blog, content_type, json)?);
    Ok(())
}

/// Build the listing printed by [`run`]
pub fn render(blog: &Blog, content_type: &str, json: bool) -> Result<String> {
    let site = blog.load()?;
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let entries: Vec<PostEntry> = site
                .posts
                .iter()
                .map(|p| PostEntry {
                    slug: &p.slug,
                    title: &p.title,
                    date: p.date.to_rfc3339(),
                    path: p.path(),
                    source: p.source.to_string_lossy().into_owned(),
                    description: p.description.as_deref(),
                    excerpt: &p.excerpt,
                    excerpt_html: &p.excerpt_html,
                    linked_assets: &p.linked_assets,
                    extra: &p.extra,
                })
                .collect();

            if json {
                let listing = PostListing {
                    posts: entries,
                    skipped: &site.diagnostics,
                };
                out.push_str(&serde_json::to_string_pretty(&listing)?);
                out.push('\n');
            } else {
                out.push_str(&format!("Posts ({}):\n", entries.len()));
                for (entry, post) in entries.iter().zip(site.posts.iter()) {
                    out.push_str(&format!(
                        "  {} - {} [{}]\n",
                        post.date.format("%Y-%m-%d"),
                        entry.title,
                        entry.source
                    ));
                }
                for diagnostic in &site.diagnostics {
                    out.push_str(&format!("  skipped: {}\n", diagnostic));
                }
            }
        }
        "route" | "routes" => {
            let table = build_route_table(blog, &site.posts)?;
            let entries: Vec<RouteEntry> = table
                .pages()
                .map(|page| RouteEntry {
                    path: page.route.path(),
                    url: absolute_url(&blog.config.site.site_url, &page.route.path()),
                    template: page.route.template(),
                    output: page
                        .route
                        .output_file()
                        .to_string_lossy()
                        .replace('\\', "/"),
                })
                .collect();

            if json {
                out.push_str(&serde_json::to_string_pretty(&entries)?);
                out.push('\n');
            } else {
                out.push_str(&format!("Routes ({}):\n", entries.len()));
                for entry in &entries {
                    out.push_str(&format!("  {} -> {}\n", entry.path, entry.output));
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: posts, routes", content_type);
        }
    }

    Ok(out)
}
