//! Static assets and files linked from posts

use anyhow::{Context, Result};
use std::fs;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{AssetKind, LinkedAsset};

/// Produces the published version of an image linked from a post
pub trait ImageProcessor: Send + Sync {
    fn process(&self, source: &Path, dest: &Path, max_width: u32) -> Result<()>;
}

/// Publishes images unchanged; the width cap is applied by the markup
pub struct CopyImageProcessor;

impl ImageProcessor for CopyImageProcessor {
    fn process(&self, source: &Path, dest: &Path, _max_width: u32) -> Result<()> {
        fs::copy(source, dest)
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;
        Ok(())
    }
}

/// Copy the assets directory into the public directory, keeping layout.
/// Returns the written files.
pub fn copy_static_assets(assets_dir: &Path, public_dir: &Path) -> Result<Vec<PathBuf>> {
    if !assets_dir.exists() {
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(assets_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read assets under {:?}", assets_dir))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(assets_dir)?;
        let dest = public_dir.join(relative);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
        copied.push(dest);
    }

    tracing::debug!("Copied {} static assets", copied.len());
    Ok(copied)
}

/// Write a linked file to its output location
pub fn publish_linked(
    asset: &LinkedAsset,
    public_dir: &Path,
    images: &dyn ImageProcessor,
) -> Result<PathBuf> {
    let dest = asset
        .output
        .split('/')
        .fold(public_dir.to_path_buf(), |path, segment| path.join(segment));

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    match asset.kind {
        AssetKind::Image { max_width } => images.process(&asset.source, &dest, max_width)?,
        AssetKind::File => {
            fs::copy(&asset.source, &dest)
                .with_context(|| format!("Failed to copy {:?}", asset.source))?;
        }
    }

    tracing::debug!("Published: {:?}", dest);
    Ok(dest)
}

/// Delete files under `public_dir` that are not in `keep`, then any
/// directories left empty. Returns the number of files removed.
pub fn prune_stale(public_dir: &Path, keep: &BTreeSet<PathBuf>) -> Result<usize> {
    if !public_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(public_dir).min_depth(1).contents_first(true) {
        let entry =
            entry.with_context(|| format!("Failed to read output under {:?}", public_dir))?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            let is_empty = fs::read_dir(path)?.next().is_none();
            if is_empty {
                fs::remove_dir(path).with_context(|| format!("Failed to remove {:?}", path))?;
            }
        } else if !keep.contains(path) {
            fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
            tracing::debug!("Removed stale output: {:?}", path);
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingProcessor {
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl ImageProcessor for RecordingProcessor {
        fn process(&self, source: &Path, dest: &Path, max_width: u32) -> Result<()> {
            self.calls.lock().unwrap().push((
                source.file_name().unwrap().to_string_lossy().into_owned(),
                max_width,
            ));
            fs::write(dest, b"resized")?;
            Ok(())
        }
    }

    #[test]
    fn test_copy_static_assets() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("icons")).unwrap();
        fs::write(assets.join("bug-icon.png"), b"png").unwrap();
        fs::write(assets.join("icons/about.svg"), b"svg").unwrap();
        let public = dir.path().join("public");

        assert_eq!(
            copy_static_assets(&assets, &public).unwrap(),
            vec![public.join("bug-icon.png"), public.join("icons/about.svg")]
        );
        assert_eq!(fs::read(public.join("icons/about.svg")).unwrap(), b"svg");
        assert!(copy_static_assets(&dir.path().join("missing"), &public)
            .unwrap()
            .is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_asset_dir_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        let locked = assets.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("icon.svg"), b"svg").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory anyway
        let readable = fs::read_dir(&locked).is_ok();
        let result = copy_static_assets(&assets, &dir.path().join("public"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            let err = result.unwrap_err();
            assert!(format!("{:#}", err).contains("Failed to read assets"));
        }
    }

    #[test]
    fn test_prune_stale_keeps_only_listed_files() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        fs::create_dir_all(public.join("old-post")).unwrap();
        fs::create_dir_all(public.join("kept")).unwrap();
        fs::write(public.join("old-post/index.html"), "old").unwrap();
        fs::write(public.join("kept/index.html"), "new").unwrap();
        fs::write(public.join("index.html"), "new").unwrap();

        let keep: BTreeSet<PathBuf> = [public.join("index.html"), public.join("kept/index.html")]
            .into_iter()
            .collect();
        assert_eq!(prune_stale(&public, &keep).unwrap(), 1);

        assert!(!public.join("old-post").exists());
        assert!(public.join("kept/index.html").exists());
        assert!(public.join("index.html").exists());
    }

    #[test]
    fn test_images_go_through_processor() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, b"jpg").unwrap();
        let public = dir.path().join("public");
        let processor = RecordingProcessor::default();

        let asset = LinkedAsset {
            source: source.clone(),
            output: "static/abc/photo.jpg".to_string(),
            kind: AssetKind::Image { max_width: 590 },
        };
        let written = publish_linked(&asset, &public, &processor).unwrap();
        assert_eq!(written, public.join("static").join("abc").join("photo.jpg"));

        assert_eq!(
            processor.calls.lock().unwrap().as_slice(),
            &[("photo.jpg".to_string(), 590)]
        );
        assert_eq!(
            fs::read(public.join("static/abc/photo.jpg")).unwrap(),
            b"resized"
        );

        let file = LinkedAsset {
            source,
            output: "static/def/photo.jpg".to_string(),
            kind: AssetKind::File,
        };
        publish_linked(&file, &public, &CopyImageProcessor).unwrap();
        assert_eq!(fs::read(public.join("static/def/photo.jpg")).unwrap(), b"jpg");
    }
}
