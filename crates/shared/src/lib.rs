// Public modules
pub mod capture;
pub mod compose;
pub mod feeds;
pub mod fonts;
pub mod io;
pub mod models;

// Re-export commonly used types
pub use capture::{BrowserEngine, ShotCapturer, VIEWPORT_H, VIEWPORT_W};
pub use compose::{fit_cover, footer_text, render_story, wrap_clamped, wrap_text, StoryLayout};
pub use feeds::{FeedPicker, DEFAULT_KEYWORDS};
pub use fonts::{FontChain, FontSet};
pub use io::{load_items, read_feed_list, save_items, shot_filename, story_filename};
pub use models::{Candidate, Item};
