use super::media_category::MediaCategory;
use super::metadata_reader::MetadataReader;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime};
use log::{debug, error, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a source file should end up, or why it will not be moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Destination(PathBuf),
    /// Extension is not a known photo or video type. Routine input.
    Unsupported,
    /// Unexpected failure while building the path; already logged.
    Failed,
}

/// Computes `<category root>/<year>/<MM-Mon>/<original name>` for a file.
///
/// Collision handling is deliberately not done here: path computation is
/// metadata-dependent and fails in metadata-specific ways, while collision
/// resolution is pure content comparison and lives in the move engine.
pub struct PathResolver<R: MetadataReader> {
    photo_root: PathBuf,
    video_root: PathBuf,
    reader: R,
}

impl<R: MetadataReader> PathResolver<R> {
    pub const fn new(photo_root: PathBuf, video_root: PathBuf, reader: R) -> Self {
        Self {
            photo_root,
            video_root,
            reader,
        }
    }

    pub fn resolve(&self, file: &Path) -> ResolveOutcome {
        let root = match MediaCategory::from_path(file) {
            MediaCategory::Photo => &self.photo_root,
            MediaCategory::Video => &self.video_root,
            MediaCategory::Unsupported => {
                warn!(
                    "File {} not processed, not a supported photo or video type",
                    file.display()
                );
                return ResolveOutcome::Unsupported;
            }
        };

        match self.build_destination(root, file) {
            Ok(destination) => ResolveOutcome::Destination(destination),
            Err(e) => {
                error!("Failed to build destination for {}: {e:#}", file.display());
                ResolveOutcome::Failed
            }
        }
    }

    fn build_destination(&self, root: &Path, file: &Path) -> Result<PathBuf> {
        let file_name = file
            .file_name()
            .ok_or_else(|| anyhow!("No file name in {}", file.display()))?;

        let taken = self.capture_moment(file)?;
        let year = taken.format("%Y").to_string();
        let season = taken.format("%m-%b").to_string();

        Ok(root.join(year).join(season).join(file_name))
    }

    /// Embedded capture date when available, last-modified time otherwise.
    /// The fallback always succeeds, so every file that reaches path
    /// construction has a capture moment.
    fn capture_moment(&self, file: &Path) -> Result<NaiveDateTime> {
        match self.reader.capture_date(file) {
            Ok(Some(taken)) => return Ok(taken),
            Ok(None) => {}
            Err(e) => {
                error!(
                    "Could not extract date metadata from {}: {e}",
                    file.display()
                );
                self.dump_tags(file);
            }
        }

        let modified = fs::metadata(file)?.modified()?;
        Ok(DateTime::<Local>::from(modified).naive_local())
    }

    /// Dumps every readable tag at warn level so odd containers can be
    /// diagnosed from the log. Plain jpg has been debugged to death already,
    /// so it is exempt.
    fn dump_tags(&self, file: &Path) {
        let is_jpg = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
        if is_jpg {
            return;
        }

        match self.reader.list_tags(file) {
            Ok(tags) => {
                for tag in tags {
                    warn!("{tag}");
                }
            }
            Err(e) => debug!("Could not list tags for {}: {e}", file.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    /// Reader test double with a canned answer.
    struct FixedReader(Option<NaiveDateTime>);

    impl MetadataReader for FixedReader {
        fn list_tags(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn capture_date(&self, _path: &Path) -> Result<Option<NaiveDateTime>> {
            Ok(self.0)
        }
    }

    struct FailingReader;

    impl MetadataReader for FailingReader {
        fn list_tags(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(vec!["Exif primary Model = ?".to_string()])
        }

        fn capture_date(&self, _path: &Path) -> Result<Option<NaiveDateTime>> {
            Err(anyhow!("corrupt metadata container"))
        }
    }

    fn resolver_with<R: MetadataReader>(reader: R) -> PathResolver<R> {
        PathResolver::new(
            PathBuf::from("/dest/Photos"),
            PathBuf::from("/dest/Videos"),
            reader,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_photo_path_shape() {
        let resolver = resolver_with(FixedReader(Some(date(2021, 7, 4))));
        let outcome = resolver.resolve(Path::new("/src/IMG_0001.jpg"));

        assert_eq!(
            outcome,
            ResolveOutcome::Destination(PathBuf::from("/dest/Photos/2021/07-Jul/IMG_0001.jpg"))
        );
    }

    #[test]
    fn test_video_uses_video_root() {
        let resolver = resolver_with(FixedReader(Some(date(2020, 1, 15))));
        let outcome = resolver.resolve(Path::new("/src/clip.mp4"));

        assert_eq!(
            outcome,
            ResolveOutcome::Destination(PathBuf::from("/dest/Videos/2020/01-Jan/clip.mp4"))
        );
    }

    #[test]
    fn test_month_is_zero_padded_with_abbreviation() {
        let resolver = resolver_with(FixedReader(Some(date(2019, 3, 2))));
        let outcome = resolver.resolve(Path::new("/src/a.png"));

        assert_eq!(
            outcome,
            ResolveOutcome::Destination(PathBuf::from("/dest/Photos/2019/03-Mar/a.png"))
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let resolver = resolver_with(FixedReader(Some(date(2021, 7, 4))));
        assert_eq!(
            resolver.resolve(Path::new("/src/notes.txt")),
            ResolveOutcome::Unsupported
        );
    }

    #[test]
    fn test_falls_back_to_modified_time() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no_meta.jpg");
        File::create(&path)
            .unwrap()
            .write_all(b"not a real jpg")
            .unwrap();

        let resolver = resolver_with(FixedReader(None));
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        let expected_taken = DateTime::<Local>::from(modified).naive_local();
        let expected = PathBuf::from("/dest/Photos")
            .join(expected_taken.format("%Y").to_string())
            .join(expected_taken.format("%m-%b").to_string())
            .join("no_meta.jpg");

        assert_eq!(resolver.resolve(&path), ResolveOutcome::Destination(expected));
    }

    #[test]
    fn test_metadata_error_still_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("odd.heic");
        File::create(&path).unwrap().write_all(b"bytes").unwrap();

        let resolver = resolver_with(FailingReader);
        match resolver.resolve(&path) {
            ResolveOutcome::Destination(dest) => {
                assert!(dest.starts_with("/dest/Photos"));
                assert!(dest.ends_with("odd.heic"));
            }
            other => panic!("expected a destination, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_fails_resolution() {
        // Reader yields nothing and the mtime fallback cannot stat the file.
        let resolver = resolver_with(FixedReader(None));
        assert_eq!(
            resolver.resolve(Path::new("/nonexistent/IMG_0001.jpg")),
            ResolveOutcome::Failed
        );
    }
}
