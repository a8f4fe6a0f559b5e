//! Configuration module

mod site;

pub use site::Author;
pub use site::HighlightConfig;
pub use site::IframesConfig;
pub use site::ImagesConfig;
pub use site::SiteConfig;
pub use site::SiteMetadata;
pub use site::Social;
