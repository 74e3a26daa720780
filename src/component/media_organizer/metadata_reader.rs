use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Embedded-metadata access used by the path resolver. Kept behind a trait
/// so the concrete decoder can be swapped without touching the resolver.
pub trait MetadataReader {
    /// Lists every readable tag as `"<ifd> <tag> = <value>"` lines. Used for
    /// diagnostics when date extraction fails on an uncommon format.
    fn list_tags(&self, path: &Path) -> Result<Vec<String>>;

    /// Extracts the original capture date, without decoding the image
    /// payload. `Ok(None)` means the file simply carries no such tag.
    fn capture_date(&self, path: &Path) -> Result<Option<NaiveDateTime>>;
}

/// EXIF-based reader. Only the metadata segments are parsed, so large media
/// files are never read in full just to get a timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataReader;

impl ExifMetadataReader {
    fn read_container(path: &Path) -> Result<Option<exif::Exif>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(Some(exif)),
            // No EXIF segment at all is routine, not a decode failure.
            Err(exif::Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl MetadataReader for ExifMetadataReader {
    fn list_tags(&self, path: &Path) -> Result<Vec<String>> {
        let Some(exif) = Self::read_container(path)? else {
            return Ok(Vec::new());
        };

        Ok(exif
            .fields()
            .map(|field| {
                format!(
                    "{} {} = {}",
                    field.ifd_num,
                    field.tag,
                    field.display_value().with_unit(&exif)
                )
            })
            .collect())
    }

    fn capture_date(&self, path: &Path) -> Result<Option<NaiveDateTime>> {
        let Some(exif) = Self::read_container(path)? else {
            return Ok(None);
        };

        let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
            return Ok(None);
        };

        let Value::Ascii(ref ascii) = field.value else {
            return Err(anyhow!(
                "DateTimeOriginal in {} is not an ASCII value",
                path.display()
            ));
        };
        let raw = ascii
            .first()
            .ok_or_else(|| anyhow!("DateTimeOriginal in {} is empty", path.display()))?;

        let taken = exif::DateTime::from_ascii(raw)?;
        let moment = NaiveDate::from_ymd_opt(
            i32::from(taken.year),
            u32::from(taken.month),
            u32::from(taken.day),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(taken.hour),
                u32::from(taken.minute),
                u32::from(taken.second),
            )
        })
        .ok_or_else(|| anyhow!("EXIF timestamp out of range: {taken}"))?;

        Ok(Some(moment))
    }
}
