//! Reading photos from disk.
//!
//! A photo is read fully into memory and its header parsed to learn the
//! pixel size. PNG bytes are embedded verbatim; the `.docx` packer only
//! accepts PNG media, so other formats are re-encoded by [`Photo::into_png`].

use image::ImageFormat;
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot identify image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Pixel size of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A photo ready for embedding.
#[derive(Debug, Clone)]
pub struct Photo {
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub dimensions: Dimensions,
    /// Encoding of `data`.
    pub format: ImageFormat,
}

impl Photo {
    /// The same photo with PNG-encoded `data`. A PNG is returned unchanged.
    pub fn into_png(self) -> Result<Photo, ImagingError> {
        if self.format == ImageFormat::Png {
            return Ok(self);
        }
        let decode_err = |e: image::ImageError| ImagingError::Decode {
            path: self.path.clone(),
            reason: e.to_string(),
        };
        let decoded =
            image::load_from_memory_with_format(&self.data, self.format).map_err(decode_err)?;
        let mut png = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, ImageFormat::Png)
            .map_err(decode_err)?;
        tracing::trace!(
            path = %self.path.display(),
            from = ?self.format,
            bytes = png.get_ref().len(),
            "re-encoded photo as PNG"
        );
        Ok(Photo {
            data: png.into_inner(),
            format: ImageFormat::Png,
            ..self
        })
    }
}

/// Absolute path of `filename` inside the photo directory.
///
/// Returns `None` for names that would leave the directory: absolute paths,
/// drive prefixes and `..` components. Falls back to the plain join when the
/// current directory is unavailable.
pub fn resolve_photo(photo_dir: &Path, filename: &str) -> Option<PathBuf> {
    let contained = Path::new(filename)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        return None;
    }
    let joined = photo_dir.join(filename);
    Some(std::path::absolute(&joined).unwrap_or(joined))
}

/// Whether a resolved photo path names an existing regular file.
///
/// An empty filename resolves to the photo directory itself, which must not
/// count as present.
pub fn photo_exists(path: &Path) -> bool {
    path.is_file()
}

/// Read a photo and identify its dimensions.
///
/// Fails with [`ImagingError::Decode`] when the bytes are not an image
/// format the `image` crate recognizes.
pub fn load_photo(path: &Path) -> Result<Photo, ImagingError> {
    let data = fs::read(path)?;
    let (format, dimensions) = identify(path, &data)?;
    Ok(Photo {
        path: path.to_path_buf(),
        data,
        dimensions,
        format,
    })
}

fn identify(path: &Path, data: &[u8]) -> Result<(ImageFormat, Dimensions), ImagingError> {
    let decode_err = |reason: String| ImagingError::Decode {
        path: path.to_path_buf(),
        reason,
    };
    let reader = image::ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let Some(format) = reader.format() else {
        return Err(decode_err("unrecognized image format".to_string()));
    };
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| decode_err(e.to_string()))?;
    Ok((format, Dimensions { width, height }))
}
