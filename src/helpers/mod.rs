//! Helper functions shared by the resolver and the templates

mod html;
mod url;

pub use html::*;
pub use url::*;
