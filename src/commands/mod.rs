//! Command handlers behind the `newsrpm` binary.

mod article;
mod body;
pub mod config;
mod output;
mod providers;
mod search;
mod upload;

pub use article::{ArticleRef, article};
pub use body::body;
pub use config::{ConfigOverrides, connect, resolve_config};
pub use output::save_json;
pub use providers::providers;
pub use search::{index, search};
pub use upload::upload;
