//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::error::BuildError;
use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Resolve all content and write the public site.
///
/// Documents that fail to resolve are skipped with a warning, unless
/// `strict` (or `strict: true` in the config) turns them into an error.
pub fn run(blog: &Blog, strict: bool) -> Result<GenerateReport> {
    let start = Instant::now();

    let site = blog.load()?;
    tracing::info!(
        "Loaded {} posts ({} skipped)",
        site.posts.len(),
        site.diagnostics.len()
    );

    if !site.diagnostics.is_empty() && (strict || blog.config.strict) {
        return Err(BuildError::Diagnostics(site.diagnostics).into());
    }

    let report = Generator::new(blog)?.generate(&site.posts)?;

    tracing::info!(
        "Generated {} pages in {:.2}s",
        report.pages,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Paths whose changes require a rebuild
pub fn watch_paths(blog: &Blog) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = Vec::new();
    for dir in [&blog.content_dir, &blog.assets_dir] {
        if dir.exists() {
            paths.push((dir.clone(), RecursiveMode::Recursive));
        }
    }
    let config_path = blog.base_dir.join("_config.yml");
    if config_path.exists() {
        paths.push((config_path, RecursiveMode::NonRecursive));
    }
    paths
}

/// Editor swap files and VCS noise do not trigger rebuilds
pub fn is_relevant_change(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// Watch for file changes and regenerate
pub async fn watch(blog: &Blog, strict: bool) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for (path, mode) in watch_paths(blog) {
        watcher.watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                if !event.paths.iter().any(|p| is_relevant_change(p)) {
                    continue;
                }
                // Editors emit bursts of events for one save
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    let blog = match Blog::new(&blog.base_dir) {
                        Ok(reloaded) => reloaded,
                        Err(e) => {
                            tracing::error!("Failed to reload config: {:#}", e);
                            blog.clone()
                        }
                    };
                    if let Err(e) = run(&blog, strict) {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
