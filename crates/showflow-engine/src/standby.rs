//! Single-slot standby image.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

use showflow_output::StandbyImage;

/// Errors raised while loading a standby image.
#[derive(Debug, Error)]
pub enum StandbyError {
    /// The file could not be read.
    #[error("Failed to read standby image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable image.
    #[error("Failed to decode standby image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Holds at most one standby image; each upload replaces it wholesale.
#[derive(Debug, Default)]
pub struct StandbySlot {
    current: Option<StandbyImage>,
    revision: u64,
}

impl StandbySlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current image, if any.
    pub fn current(&self) -> Option<&StandbyImage> {
        self.current.as_ref()
    }

    /// Whether an image is loaded.
    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }

    /// Read and decode a file into the slot. On failure the slot is unchanged.
    #[instrument(name = "standby_upload", skip(self))]
    pub fn upload(&mut self, path: &Path) -> Result<&StandbyImage, StandbyError> {
        let data = std::fs::read(path).map_err(|source| StandbyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.upload_bytes(&data)
    }

    /// Decode encoded image bytes into the slot. On failure the slot is unchanged.
    pub fn upload_bytes(&mut self, data: &[u8]) -> Result<&StandbyImage, StandbyError> {
        let rgba = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        self.revision += 1;
        debug!(revision = self.revision, width, height, "Standby image replaced");

        Ok(&*self.current.insert(StandbyImage {
            revision: self.revision,
            width,
            height,
            pixels: Bytes::from(rgba.into_raw()),
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::*;

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    pub(crate) fn png_file(name: &str, width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "showflow-{}-{}.png",
            std::process::id(),
            name
        ));
        std::fs::write(&path, png(width, height)).unwrap();
        path
    }

    #[test]
    fn test_upload_decodes_to_rgba() {
        let mut slot = StandbySlot::new();
        let image = slot.upload_bytes(&png(3, 2)).unwrap();

        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 3 * 2 * 4);
        assert_eq!(&image.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_upload_replaces_previous() {
        let mut slot = StandbySlot::new();
        slot.upload_bytes(&png(1, 1)).unwrap();
        slot.upload_bytes(&png(4, 4)).unwrap();

        let current = slot.current().unwrap();
        assert_eq!(current.revision, 2);
        assert_eq!(current.width, 4);
    }

    #[test]
    fn test_decode_failure_leaves_slot_unchanged() {
        let mut slot = StandbySlot::new();
        slot.upload_bytes(&png(2, 2)).unwrap();

        let err = slot.upload_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, StandbyError::Decode(_)));
        assert_eq!(slot.current().unwrap().revision, 1);
    }

    #[test]
    fn test_upload_from_file() {
        let path = png_file("slot-upload", 2, 5);
        let mut slot = StandbySlot::new();

        let image = slot.upload(&path).unwrap();
        assert_eq!((image.width, image.height), (2, 5));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let mut slot = StandbySlot::new();
        let err = slot
            .upload(Path::new("/nonexistent/showflow/standby.png"))
            .unwrap_err();

        assert!(matches!(err, StandbyError::Read { .. }));
        assert!(!slot.is_set());
    }
}
