//! Content module - source documents, resolution and queries

pub mod excerpt;
mod frontmatter;
mod markdown;
mod post;
pub mod resolver;
pub mod slug;
pub mod store;
pub mod transform;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use resolver::{Posts, Resolution, Resolver};
pub use store::{ContentNode, ContentStore};
pub use transform::{AssetKind, LinkedAsset, Pipeline, Transform, TransformContext};
