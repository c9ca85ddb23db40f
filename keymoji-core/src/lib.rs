// Emoji run matching and asset resolution for keyboard previews.
//
// The matcher finds emoji sequences in text, the resolver maps a style and a
// display size to an asset directory (probing it once), and the renderer
// stitches both together.

pub mod cache;
pub mod config;
pub mod error;
pub mod ladder;
pub mod matcher;
pub mod probe;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod shortcode;

pub use cache::ResolverCache;
pub use crate::config::Settings;
pub use error::{Error, Result};
pub use ladder::RasterLadder;
pub use matcher::{count_emoji, find_emoji_runs, icon_id, strip_emoji};
pub use probe::{AssetProbe, DefaultProbe};
pub use registry::StyleRegistry;
pub use render::Renderer;
pub use resolver::{Resolver, ResolverOptions};
