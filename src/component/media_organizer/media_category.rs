use std::path::Path;

pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "heic"];
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mov", "avi", "mp4", "m4v", "wmv", "3gp"];

/// Media kind as decided by the file extension alone. Content is never
/// sniffed; an extensionless or unknown file is `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Photo,
    Video,
    Unsupported,
}

impl MediaCategory {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
        else {
            return Self::Unsupported;
        };

        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Photo
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Unsupported
        }
    }
}
