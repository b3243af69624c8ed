//! Core of the campus site.
//!
//! This crate holds the two interactive pieces of the site:
//! - `calendar`: the academic calendar engine (month grids, event days, navigation)
//! - `story`: the auto-advancing story viewer and its playback driver
//!
//! Content (events and stories) comes from the `content` module; nothing here
//! renders anything.

pub mod calendar;
pub mod config;
pub mod content;
pub mod error;
pub mod story;
pub mod timer;

pub use config::CampusConfig;
pub use content::Content;
pub use error::{CampusError, CampusResult};
