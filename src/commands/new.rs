//! Create a new post

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create `<content_dir>/<slug>/index.md` dated now in the site timezone
pub fn create_post(blog: &Blog, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }
    if crate::content::slug::is_reserved(&slug) {
        anyhow::bail!("Slug {:?} is reserved for a built-in page", slug);
    }

    let target_dir = blog.content_dir.join(&slug);
    let file_path = target_dir.join("index.md");
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = Utc::now().with_timezone(&blog.config.tz());
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription: \"\"\n---\n\n",
        yaml_scalar(title)?,
        now.format("%Y-%m-%dT%H:%M:%S%:z")
    );

    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;
    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

/// Quote a title only when YAML needs it
fn yaml_scalar(value: &str) -> Result<String> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}
