//! Content transform pipeline
//!
//! Each post's rendered HTML passes through a fixed, ordered list of
//! transforms. A transform rewrites the document and may record files the
//! generator has to publish next to the pages.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;

/// Output directory (under the public dir) for files linked from posts
pub const STATIC_DIR: &str = "static";

/// Characters escaped in a published file name
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

lazy_static! {
    static ref IMG_RE: Regex =
        Regex::new(r#"<img\b([^>]*?)\bsrc="([^"]*)"([^>]*?)\s*/?>"#).unwrap();
    static ref IFRAME_RE: Regex = Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe>").unwrap();
    static ref HREF_RE: Regex = Regex::new(r#"\bhref="([^"]*)""#).unwrap();
    static ref WIDTH_RE: Regex = Regex::new(r#"\bwidth="(\d+)""#).unwrap();
    static ref HEIGHT_RE: Regex = Regex::new(r#"\bheight="(\d+)""#).unwrap();
}

/// What kind of processing a linked file needs on its way to the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssetKind {
    /// Raster image, capped at the given width
    Image { max_width: u32 },
    /// Any other file, copied as-is
    File,
}

/// A file referenced from a post that must be published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedAsset {
    /// Absolute path of the referenced file
    pub source: PathBuf,
    /// Output path relative to the public dir, `/`-separated
    pub output: String,
    pub kind: AssetKind,
}

impl LinkedAsset {
    /// URL the rewritten document points at
    pub fn url(&self) -> String {
        let encoded: Vec<String> = self
            .output
            .split('/')
            .map(|s| utf8_percent_encode(s, PATH_SEGMENT).to_string())
            .collect();
        format!("/{}", encoded.join("/"))
    }
}

/// Per-post state threaded through the pipeline
pub struct TransformContext<'a> {
    /// Content root, used to key published files
    pub content_root: &'a Path,
    /// Directory holding the post's source file
    pub source_dir: &'a Path,
    /// Files the transforms asked to publish
    pub assets: Vec<LinkedAsset>,
}

impl<'a> TransformContext<'a> {
    pub fn new(content_root: &'a Path, source_dir: &'a Path) -> Self {
        Self {
            content_root,
            source_dir,
            assets: Vec::new(),
        }
    }

    /// Resolve a document-relative reference to an existing file beside the
    /// post. Absolute URLs, fragments and missing files give `None`.
    fn local_file(&self, reference: &str) -> Option<PathBuf> {
        if reference.is_empty()
            || reference.starts_with('#')
            || reference.starts_with('/')
            || reference.contains("://")
            || reference.starts_with("mailto:")
            || reference.starts_with("data:")
        {
            return None;
        }

        let without_query = reference.split(['?', '#']).next().unwrap_or(reference);
        // Rendered hrefs carry `&` and `'` as entities
        let unescaped = without_query.replace("&#x27;", "'").replace("&amp;", "&");
        let decoded = percent_decode_str(&unescaped)
            .decode_utf8_lossy()
            .into_owned();
        let path = self.source_dir.join(decoded);
        path.is_file().then_some(path)
    }

    /// Record a file for publishing and return it
    fn publish(&mut self, source: PathBuf, kind: AssetKind) -> LinkedAsset {
        let key = source
            .strip_prefix(self.content_root)
            .unwrap_or(&source)
            .to_string_lossy()
            .replace('\\', "/");
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let asset = LinkedAsset {
            output: format!("{}/{}/{}", STATIC_DIR, hash_key(&key), file_name),
            source,
            kind,
        };
        if !self.assets.contains(&asset) {
            self.assets.push(asset.clone());
        }
        asset
    }
}

/// Stable key for a published file, derived from its source path only
fn hash_key(key: &str) -> String {
    let hex = blake3::hash(key.as_bytes()).to_hex();
    hex.as_str()[..16].to_string()
}

/// One step of the pipeline
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, html: &str, ctx: &mut TransformContext) -> Result<String>;
}

/// Ordered list of transforms, composed left to right
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }

    /// A pipeline that leaves documents untouched
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The built-in pipeline: images, iframes, then remaining linked files
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(vec![
            Box::new(ResponsiveImages {
                max_width: config.images.max_width,
            }),
            Box::new(ResponsiveIframes {
                wrapper_style: config.iframes.wrapper_style.clone(),
            }),
            Box::new(CopyLinkedFiles),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn apply(&self, html: String, ctx: &mut TransformContext) -> Result<String> {
        self.transforms.iter().try_fold(html, |html, transform| {
            transform
                .apply(&html, ctx)
                .with_context(|| format!("transform {} failed", transform.name()))
        })
    }
}

/// Publishes images that sit beside the post and caps their display width
pub struct ResponsiveImages {
    pub max_width: u32,
}

impl Transform for ResponsiveImages {
    fn name(&self) -> &'static str {
        "responsive-images"
    }

    fn apply(&self, html: &str, ctx: &mut TransformContext) -> Result<String> {
        let out = IMG_RE.replace_all(html, |caps: &Captures| {
            let Some(source) = ctx.local_file(&caps[2]) else {
                return caps[0].to_string();
            };
            let asset = ctx.publish(
                source,
                AssetKind::Image {
                    max_width: self.max_width,
                },
            );
            format!(
                r#"<img{}src="{}"{} style="max-width: {}px; width: 100%;" loading="lazy" />"#,
                &caps[1],
                asset.url(),
                &caps[3],
                self.max_width
            )
        });
        Ok(out.into_owned())
    }
}

/// Wraps embedded iframes in a container that keeps their aspect ratio
pub struct ResponsiveIframes {
    pub wrapper_style: String,
}

impl Transform for ResponsiveIframes {
    fn name(&self) -> &'static str {
        "responsive-iframes"
    }

    fn apply(&self, html: &str, _ctx: &mut TransformContext) -> Result<String> {
        let out = IFRAME_RE.replace_all(html, |caps: &Captures| {
            let iframe = &caps[0];
            let width = WIDTH_RE
                .captures(iframe)
                .and_then(|c| c[1].parse::<f64>().ok());
            let height = HEIGHT_RE
                .captures(iframe)
                .and_then(|c| c[1].parse::<f64>().ok());

            let mut style = self.wrapper_style.trim().trim_end_matches(';').to_string();
            if let (Some(w), Some(h)) = (width, height) {
                if w > 0.0 {
                    if !style.is_empty() {
                        style.push_str("; ");
                    }
                    style.push_str(&format!(
                        "position: relative; height: 0; overflow: hidden; padding-bottom: {:.4}%",
                        h / w * 100.0
                    ));
                }
            }

            format!(
                r#"<div class="responsive-iframe-container" style="{}">{}</div>"#,
                style, iframe
            )
        });
        Ok(out.into_owned())
    }
}

/// Publishes any other file a post links to
pub struct CopyLinkedFiles;

impl Transform for CopyLinkedFiles {
    fn name(&self) -> &'static str {
        "copy-linked-files"
    }

    fn apply(&self, html: &str, ctx: &mut TransformContext) -> Result<String> {
        let out = HREF_RE.replace_all(html, |caps: &Captures| {
            let Some(source) = ctx.local_file(&caps[1]) else {
                return caps[0].to_string();
            };
            let is_markdown = matches!(
                source.extension().and_then(|e| e.to_str()),
                Some("md") | Some("markdown")
            );
            if is_markdown {
                return caps[0].to_string();
            }
            let asset = ctx.publish(source, AssetKind::File);
            format!(r#"href="{}""#, asset.url())
        });
        Ok(out.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let post = dir.path().join("trip");
        fs::create_dir_all(&post).unwrap();
        fs::write(post.join("photo one.png"), b"png").unwrap();
        fs::write(post.join("notes.pdf"), b"pdf").unwrap();
        dir
    }

    #[test]
    fn test_images_are_published_and_capped() {
        let dir = fixture();
        let source_dir = dir.path().join("trip");
        let mut ctx = TransformContext::new(dir.path(), &source_dir);

        let html = r#"<p><img src="photo%20one.png" alt="A photo" /></p>"#;
        let out = ResponsiveImages { max_width: 590 }.apply(html, &mut ctx).unwrap();

        assert_eq!(ctx.assets.len(), 1);
        let asset = &ctx.assets[0];
        assert!(asset.output.starts_with("static/"));
        assert!(asset.output.ends_with("/photo one.png"));
        assert_eq!(asset.kind, AssetKind::Image { max_width: 590 });
        assert!(out.contains(&format!(r#"src="{}""#, asset.url())));
        assert!(asset.url().ends_with("/photo%20one.png"));
        assert!(out.contains(r#"alt="A photo""#));
        assert!(out.contains("max-width: 590px"));
    }

    #[test]
    fn test_remote_and_missing_images_untouched() {
        let dir = fixture();
        let source_dir = dir.path().join("trip");
        let mut ctx = TransformContext::new(dir.path(), &source_dir);

        let html = r#"<img src="https://example.com/a.png" alt="" /><img src="missing.png" alt="" />"#;
        let out = ResponsiveImages { max_width: 590 }.apply(html, &mut ctx).unwrap();
        assert_eq!(out, html);
        assert!(ctx.assets.is_empty());
    }

    #[test]
    fn test_iframes_are_wrapped() {
        let dir = fixture();
        let mut ctx = TransformContext::new(dir.path(), dir.path());
        let transform = ResponsiveIframes {
            wrapper_style: "margin-bottom: 1.0725rem".to_string(),
        };
        let html = r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/x"></iframe>"#;
        let out = transform.apply(html, &mut ctx).unwrap();
        assert!(out.starts_with(r#"<div class="responsive-iframe-container" style="margin-bottom: 1.0725rem; "#));
        assert!(out.contains("padding-bottom: 56.2500%"));
        assert!(out.ends_with("</iframe></div>"));
    }

    #[test]
    fn test_linked_files_are_published() {
        let dir = fixture();
        let source_dir = dir.path().join("trip");
        let mut ctx = TransformContext::new(dir.path(), &source_dir);

        let html = r##"<a href="notes.pdf">notes</a> <a href="#top">top</a> <a href="https://x.dev">x</a>"##;
        let out = CopyLinkedFiles.apply(html, &mut ctx).unwrap();

        assert_eq!(ctx.assets.len(), 1);
        assert_eq!(ctx.assets[0].kind, AssetKind::File);
        assert!(out.contains(&format!(r#"href="{}""#, ctx.assets[0].url())));
        assert!(out.contains(r##"href="#top""##));
        assert!(out.contains(r#"href="https://x.dev""#));
    }

    #[test]
    fn test_published_paths_are_stable() {
        let dir = fixture();
        let source_dir = dir.path().join("trip");
        let html = r#"<a href="notes.pdf">notes</a>"#;

        let mut first = TransformContext::new(dir.path(), &source_dir);
        let mut second = TransformContext::new(dir.path(), &source_dir);
        let a = Pipeline::from_config(&SiteConfig::default())
            .apply(html.to_string(), &mut first)
            .unwrap();
        let b = Pipeline::from_config(&SiteConfig::default())
            .apply(html.to_string(), &mut second)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(first.assets, second.assets);
    }

    #[test]
    fn test_hash_key_is_blake3_prefix() {
        // BLAKE3 of the empty input
        assert_eq!(hash_key(""), "af1349b9f5f9a1a6");
        let key = hash_key("trip/notes.pdf");
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_published_path_ignores_site_location() {
        let one = fixture();
        let two = fixture();
        let html = r#"<a href="notes.pdf">notes</a>"#;

        let source_one = one.path().join("trip");
        let mut first = TransformContext::new(one.path(), &source_one);
        CopyLinkedFiles.apply(html, &mut first).unwrap();
        let source_two = two.path().join("trip");
        let mut second = TransformContext::new(two.path(), &source_two);
        CopyLinkedFiles.apply(html, &mut second).unwrap();

        assert_eq!(first.assets[0].output, second.assets[0].output);
        assert_eq!(
            first.assets[0].output,
            format!("static/{}/notes.pdf", hash_key("trip/notes.pdf"))
        );
    }

    #[test]
    fn test_apostrophe_in_linked_file_name() {
        let dir = fixture();
        let source_dir = dir.path().join("trip");
        fs::write(source_dir.join("it's.pdf"), b"pdf").unwrap();
        let mut ctx = TransformContext::new(dir.path(), &source_dir);

        let renderer = crate::content::MarkdownRenderer::new();
        let html = renderer.render("[read](it's.pdf)");
        assert!(html.contains("&#x27;"));

        let out = CopyLinkedFiles.apply(&html, &mut ctx).unwrap();
        assert_eq!(ctx.assets.len(), 1);
        assert!(ctx.assets[0].output.ends_with("/it's.pdf"));
        assert!(out.contains(&format!(r#"href="{}""#, ctx.assets[0].url())));
    }

    #[test]
    fn test_pipeline_order() {
        let pipeline = Pipeline::from_config(&SiteConfig::default());
        assert_eq!(
            pipeline.names(),
            vec!["responsive-images", "responsive-iframes", "copy-linked-files"]
        );
    }
}
