//! Slug derivation from source paths

use std::path::{Component, Path};

/// Top-level slugs that would shadow a built-in route or output directory
pub const RESERVED: &[&str] = &["about", "static"];

/// Derive the URL slug for a file, given its path relative to the content
/// root.
///
/// `hello-world/index.md` and `hello-world.md` both give `hello-world`;
/// nested directories keep their structure (`2020/My Trip.md` gives
/// `2020/my-trip`). The result depends on nothing but the path.
pub fn derive_slug(relative_path: &Path) -> String {
    let mut segments: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(last);
        if stem != "index" {
            segments.push(stem);
        }
    }

    segments
        .iter()
        .map(|s| slug::slugify(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a slug lands on a route the generator owns
pub fn is_reserved(slug: &str) -> bool {
    let first = slug.split('/').next().unwrap_or(slug);
    RESERVED.contains(&first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_directory_forms() {
        assert_eq!(derive_slug(Path::new("hello-world.md")), "hello-world");
        assert_eq!(derive_slug(Path::new("hello-world/index.md")), "hello-world");
        assert_eq!(derive_slug(Path::new("notes/index.markdown")), "notes");
    }

    #[test]
    fn test_segments_are_slugified() {
        assert_eq!(derive_slug(Path::new("2020/My Trip.md")), "2020/my-trip");
        assert_eq!(
            derive_slug(Path::new("Déjà Vu/index.md")),
            "deja-vu"
        );
    }

    #[test]
    fn test_root_index_is_empty() {
        assert_eq!(derive_slug(Path::new("index.md")), "");
    }

    #[test]
    fn test_deterministic() {
        let paths = ["a.md", "b/index.md", "Some Post.md", "2024/01/x.md"];
        for p in paths {
            assert_eq!(derive_slug(Path::new(p)), derive_slug(Path::new(p)));
        }
    }

    #[test]
    fn test_reserved() {
        assert!(is_reserved("about"));
        assert!(is_reserved("static/x"));
        assert!(!is_reserved("about-me"));
        assert!(!is_reserved("2020/about"));
    }
}
