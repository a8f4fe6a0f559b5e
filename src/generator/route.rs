//! Routes and the pages bound to them

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::BuildError;
use crate::templates::{PostListItem, PostView};

/// A logical page of the site
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Route {
    Index,
    About,
    Post(String),
}

impl Route {
    /// URL path, always with a trailing slash
    pub fn path(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::About => "/about/".to_string(),
            Route::Post(slug) => format!("/{}/", slug),
        }
    }

    /// Output file relative to the public dir
    pub fn output_file(&self) -> PathBuf {
        let path = self.path();
        let mut file = PathBuf::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            file.push(segment);
        }
        file.join("index.html")
    }

    /// Template bound to the route
    pub fn template(&self) -> &'static str {
        match self {
            Route::Index => "index.html",
            Route::About => "about.html",
            Route::Post(_) => "post.html",
        }
    }
}

/// Query result bound to a page template
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Index { posts: Vec<PostListItem> },
    About { items: Vec<String> },
    Post(PostView),
}

/// A route with everything needed to render it
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub route: Route,
    /// Document title, shown before the site title
    pub title: String,
    pub description: String,
    pub body: PageBody,
}

/// Pages keyed by route path; each path is claimed once
#[derive(Debug, Default)]
pub struct RouteTable {
    pages: BTreeMap<String, Page>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page: Page) -> Result<(), BuildError> {
        let path = page.route.path();
        if self.pages.contains_key(&path) {
            return Err(BuildError::RouteConflict { path });
        }
        self.pages.insert(path, page);
        Ok(())
    }

    /// Pages in route path order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn get(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
