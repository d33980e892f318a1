//! Data models

mod api_key;
mod document;
mod plan;
mod profile;
mod scan;
mod user;
mod view;

pub use api_key::*;
pub use document::*;
pub use plan::*;
pub use profile::*;
pub use scan::*;
pub use user::*;
pub use view::*;
