//! Feature components
//!
//! Each submodule implements one self-contained feature with its own tools.

pub mod media_organizer;

pub use media_organizer::MediaOrganizer;
