use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{Font, FontArc, InvalidFont};
use image::ImageReader;
use rodio::Decoder;
use thiserror::Error;
use tracing::debug;

use super::canvas::{FontHandle, ImageHandle};

const IMAGES_DIR: &str = "images";
const FONTS_DIR: &str = "fonts";
const MUSIC_DIR: &str = "music";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    Missing(PathBuf),
    #[error("failed to read asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    DecodeImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse font {path}: {source}")]
    DecodeFont {
        path: PathBuf,
        #[source]
        source: InvalidFont,
    },
    #[error("decoded image {path} has inconsistent pixel data")]
    ImageData { path: PathBuf },
    #[error("failed to decode audio track {path}: {source}")]
    DecodeAudio {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Encoded audio file kept in memory so the track can be decoded again on every rewind.
#[derive(Debug, Clone)]
pub struct TrackData {
    name: String,
    bytes: Arc<[u8]>,
}

impl TrackData {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn cursor(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.bytes))
    }
}

/// Loads assets from `<root>/images`, `<root>/fonts` and `<root>/music`.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_image(&self, relative: &str) -> Result<ImageHandle, AssetError> {
        let path = self.root.join(IMAGES_DIR).join(relative);
        let reader = ImageReader::open(&path).map_err(|source| io_error(&path, source))?;
        let decoded = reader
            .with_guessed_format()
            .map_err(|source| io_error(&path, source))?
            .decode()
            .map_err(|source| AssetError::DecodeImage {
                path: path.clone(),
                source,
            })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let handle = ImageHandle::from_rgba(relative, width, height, rgba.into_raw())
            .ok_or_else(|| AssetError::ImageData { path: path.clone() })?;
        debug!(path = %path.display(), width, height, "image_loaded");
        Ok(handle)
    }

    /// Parses a TrueType or OpenType face and sizes it in pixels.
    pub fn load_font(&self, relative: &str, size_px: u32) -> Result<FontHandle, AssetError> {
        let path = self.root.join(FONTS_DIR).join(relative);
        let bytes = fs::read(&path).map_err(|source| io_error(&path, source))?;
        let font = FontArc::try_from_vec(bytes).map_err(|source| AssetError::DecodeFont {
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            size_px,
            glyphs = font.glyph_count(),
            "font_loaded"
        );
        Ok(FontHandle::from_face(relative, font, size_px))
    }

    pub fn load_track(&self, relative: &str) -> Result<TrackData, AssetError> {
        let path = self.root.join(MUSIC_DIR).join(relative);
        let bytes = fs::read(&path).map_err(|source| io_error(&path, source))?;
        let track = TrackData {
            name: relative.to_string(),
            bytes: Arc::from(bytes),
        };
        Decoder::new(track.cursor()).map_err(|source| AssetError::DecodeAudio {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "track_loaded");
        Ok(track)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> AssetError {
    if source.kind() == std::io::ErrorKind::NotFound {
        AssetError::Missing(path.to_path_buf())
    } else {
        AssetError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
