//! Media organizing component
//!
//! Walks an unsorted source tree depth-first and moves every photo and video
//! into `<category root>/<year>/<MM-Mon>/<original name>`, using BLAKE3
//! hashes to detect duplicates instead of overwriting anything.

mod main;
mod media_category;
mod metadata_reader;
mod move_engine;
mod path_resolver;

pub use main::{MediaOrganizer, OrganizeResult};
pub use media_category::{MediaCategory, PHOTO_EXTENSIONS, VIDEO_EXTENSIONS};
pub use metadata_reader::{ExifMetadataReader, MetadataReader};
pub use move_engine::{MoveEngine, MoveOutcome};
pub use path_resolver::{PathResolver, ResolveOutcome};
