//! Content resolver - turns source documents into queryable posts

use anyhow::Result;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::excerpt::{html_excerpt, plain_excerpt};
use super::slug::{derive_slug, is_reserved};
use super::store::{ContentNode, ContentStore};
use super::transform::{Pipeline, TransformContext};
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::error::{BuildError, Diagnostic};

/// Resolves every node of a store into a [`Post`]
pub struct Resolver<'a> {
    renderer: &'a MarkdownRenderer,
    pipeline: &'a Pipeline,
    tz: chrono_tz::Tz,
    excerpt_length: usize,
}

/// Outcome of a resolution pass
#[derive(Debug)]
pub struct Resolution {
    pub posts: Posts,
    /// Documents that were left out, with the reason
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        renderer: &'a MarkdownRenderer,
        pipeline: &'a Pipeline,
        tz: chrono_tz::Tz,
        excerpt_length: usize,
    ) -> Self {
        Self {
            renderer,
            pipeline,
            tz,
            excerpt_length,
        }
    }

    /// Resolve the whole store.
    ///
    /// Slugs are checked first, over every node: a collision or a reserved
    /// slug aborts the run even if one of the documents is broken. Any
    /// other per-document problem excludes only that document.
    pub fn resolve(&self, store: &ContentStore) -> Result<Resolution, BuildError> {
        let mut claimed: BTreeMap<String, &ContentNode> = BTreeMap::new();
        let mut slugged = Vec::with_capacity(store.len());

        for node in store.nodes() {
            let slug = derive_slug(&node.relative_path);
            if slug.is_empty() {
                return Err(BuildError::EmptySlug {
                    source_path: node.relative_path.clone(),
                });
            }
            if is_reserved(&slug) {
                return Err(BuildError::ReservedSlug {
                    slug,
                    source_path: node.relative_path.clone(),
                });
            }
            match claimed.entry(slug.clone()) {
                Entry::Occupied(first) => {
                    return Err(BuildError::SlugCollision {
                        slug,
                        first: first.get().relative_path.clone(),
                        second: node.relative_path.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
            slugged.push((slug, node));
        }

        let mut posts = Vec::with_capacity(slugged.len());
        let mut diagnostics = Vec::new();

        for (slug, node) in slugged {
            match self.resolve_node(slug, node, store.root()) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {:#}", node.relative_path, e);
                    diagnostics.push(Diagnostic::new(&node.relative_path, format!("{:#}", e)));
                }
            }
        }

        tracing::debug!(
            "Resolved {} posts, {} skipped",
            posts.len(),
            diagnostics.len()
        );

        Ok(Resolution {
            posts: Posts::new(posts),
            diagnostics,
        })
    }

    /// Resolve one node whose slug is already known to be unique
    fn resolve_node(&self, slug: String, node: &ContentNode, root: &Path) -> Result<Post> {
        let (fm, body) = FrontMatter::parse(&node.raw)?;
        let date = fm.parse_date(&self.tz)?;

        let source_dir = node.path.parent().unwrap_or(root);
        let mut ctx = TransformContext::new(root, source_dir);
        let html = self.pipeline.apply(self.renderer.render(body), &mut ctx)?;

        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| slug.clone());

        Ok(Post {
            title,
            date,
            description: fm.description,
            excerpt: plain_excerpt(body, self.excerpt_length),
            excerpt_html: html_excerpt(body, self.excerpt_length),
            html,
            source: node.relative_path.clone(),
            linked_assets: ctx.assets,
            extra: fm.extra,
            slug,
        })
    }
}

/// Typed, read-only query interface over resolved posts
#[derive(Debug, Default)]
pub struct Posts {
    /// Newest first, equal dates by slug ascending
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
}

impl Posts {
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.slug.clone(), i))
            .collect();
        Self { posts, by_slug }
    }

    /// All posts, newest first; equal dates ordered by slug
    pub fn all_sorted_by_date_desc(&self) -> &[Post] {
        &self.posts
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    /// Posts matching `predicate`, keeping date order
    pub fn filter<F>(&self, predicate: F) -> Vec<&Post>
    where
        F: Fn(&Post) -> bool,
    {
        self.posts.iter().filter(|p| predicate(p)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
