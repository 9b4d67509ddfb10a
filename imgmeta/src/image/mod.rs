//! The [`Image`] handle.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    container::{ExifData, IptcData, XmpData},
    error::{CodecError, CodecErrorKind, Error, Result},
    magic_number::{AnyProvider, MagicNumber},
};

mod mutate;
mod state;

pub(crate) use state::ImageState;

/// Where an image's bytes came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Read from this file.
    File(PathBuf),

    /// Copied from caller-provided bytes.
    Bytes,
}

/// An opened image.
///
/// This is a handle: clones share the same image, and it's freed when the
/// last handle (including any container, datum or iterator made from it) is
/// dropped.
///
/// Every method takes `&self`. Access to one image is serialized by a lock,
/// so handles may be sent to and shared between threads.
#[derive(Clone)]
pub struct Image {
    inner: Arc<RwLock<ImageState>>,
}

impl Image {
    /// Opens an image file.
    ///
    /// The container layout is parsed right away, but metadata isn't. Call
    /// [`Image::read_metadata`] to load it.
    ///
    /// # Errors
    ///
    /// - `OpenFailed` when the file can't be read.
    /// - `UnknownImageType` when it isn't a supported format.
    /// - `FailedToReadImageData` when it's a supported format, but malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::trace!("Opening image at `{}`...", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            log::error!("Couldn't read `{}`. err: {e}", path.display());
            CodecError::new(
                CodecErrorKind::OpenFailed,
                format!("{}: Failed to open the data source: {e}", path.display()),
            )
        })?;

        let provider = match AnyProvider::new(&bytes) {
            Some(Ok(provider)) => provider,
            Some(Err(e)) => {
                return Err(CodecError::new(
                    CodecErrorKind::FailedToReadImageData,
                    format!("{}: Failed to read image data: {e}", path.display()),
                )
                .into());
            }
            None => {
                log::error!("`{}` isn't a supported image.", path.display());
                return Err(CodecError::new(
                    CodecErrorKind::UnknownImageType,
                    format!(
                        "{}: The file contains data of an unknown image type",
                        path.display()
                    ),
                )
                .into());
            }
        };

        Ok(Self::from_state(ImageState::new(
            Origin::File(path.to_path_buf()),
            bytes,
            provider,
        )))
    }

    /// Opens an image from bytes in memory.
    ///
    /// The bytes are copied, so the caller may drop or reuse its buffer
    /// right away.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for zero bytes.
    /// - `InputDataReadFailed` when they aren't a supported format.
    /// - `FailedToReadImageData` when they're a supported format, but
    ///   malformed.
    pub fn open_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            log::error!("Can't open an image from zero bytes.");
            return Err(Error::EmptyInput);
        }

        let provider = match AnyProvider::new(&bytes) {
            Some(Ok(provider)) => provider,
            Some(Err(e)) => {
                return Err(CodecError::new(
                    CodecErrorKind::FailedToReadImageData,
                    format!("Failed to read image data: {e}"),
                )
                .into());
            }
            None => {
                log::error!("Given `{}` bytes that aren't a supported image.", bytes.len());
                return Err(CodecError::new(
                    CodecErrorKind::InputDataReadFailed,
                    "Failed to read input data",
                )
                .into());
            }
        };

        Ok(Self::from_state(ImageState::new(
            Origin::Bytes,
            bytes.to_vec(),
            provider,
        )))
    }

    fn from_state(state: ImageState) -> Self {
        log::debug!(
            "Opened a `{}` image from `{:?}`.",
            state.provider().magic_number(),
            state.origin()
        );
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, ImageState> {
        self.inner.read()
    }

    pub(crate) fn state_mut(&self) -> RwLockWriteGuard<'_, ImageState> {
        self.inner.write()
    }

    /// Parses the image's metadata.
    ///
    /// Pending changes are written into the image first, so what's read back
    /// is exactly what [`Image::get_bytes`] would hold. This can be called
    /// any number of times. Iterators that were running when it's called
    /// stop early.
    ///
    /// # Errors
    ///
    /// `CorruptedMetadata` if a metadata blob is malformed.
    pub fn read_metadata(&self) -> Result<()> {
        self.state_mut().read_metadata().map_err(Error::from)
    }

    /// Width in pixels, or `0` if the image doesn't say.
    pub fn pixel_width(&self) -> u32 {
        self.state().provider().dimensions().map_or(0, |(w, _)| w)
    }

    /// Height in pixels, or `0` if the image doesn't say.
    pub fn pixel_height(&self) -> u32 {
        self.state().provider().dimensions().map_or(0, |(_, h)| h)
    }

    /// The embedded ICC color profile.
    ///
    /// Missing and empty profiles both give `None`.
    pub fn icc_profile(&self) -> Option<Vec<u8>> {
        self.state()
            .provider()
            .icc_profile()
            .filter(|profile| !profile.is_empty())
    }

    /// The image's bytes, with every change applied.
    ///
    /// Without changes, these are the bytes the image was opened from.
    ///
    /// # Errors
    ///
    /// Fails when the changes can't be written. Mutations check that their
    /// result fits before they're accepted, so this is rare.
    pub fn get_bytes(&self) -> Result<Vec<u8>> {
        {
            let state = self.state();
            if !state.is_dirty() {
                return Ok(state.buffer().to_vec());
            }
        }

        let mut state = self.state_mut();
        Ok(state.bytes()?.to_vec())
    }

    /// Writes the image back to the file it was opened from.
    ///
    /// # Errors
    ///
    /// `WriteFailed` for images opened from bytes, or when the file can't be
    /// written.
    pub fn save(&self) -> Result<()> {
        let Origin::File(path) = self.origin() else {
            log::error!("Tried to save an image that has no file.");
            return Err(CodecError::new(
                CodecErrorKind::WriteFailed,
                "Image was opened from memory, so it has no file to save to",
            )
            .into());
        };

        self.save_to(path)
    }

    /// Writes the image to a file.
    ///
    /// # Errors
    ///
    /// `WriteFailed` when the file can't be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.get_bytes()?;

        std::fs::write(path, &bytes).map_err(|e| {
            log::error!("Couldn't write `{}`. err: {e}", path.display());
            CodecError::new(
                CodecErrorKind::WriteFailed,
                format!("{}: Failed to write image: {e}", path.display()),
            )
        })?;

        log::debug!("Saved `{}` bytes to `{}`.", bytes.len(), path.display());
        Ok(())
    }

    pub fn origin(&self) -> Origin {
        self.state().origin().clone()
    }

    /// The detected container format.
    pub fn format(&self) -> MagicNumber {
        self.state().provider().magic_number()
    }

    /// Whether the image holds any EXIF, IPTC or XMP.
    ///
    /// Before metadata is loaded, this checks for the blobs themselves.
    pub fn has_metadata(&self) -> bool {
        let state = self.state();
        match state.metadata() {
            Some(m) => !(m.exif.is_empty() && m.iptc.is_empty() && m.xmp.is_empty()),
            None => {
                let provider = state.provider();
                provider.exif_raw().is_some()
                    || provider.iptc_raw().is_some()
                    || provider.xmp_raw().is_some()
            }
        }
    }

    /// A view of the image's EXIF.
    pub fn exif_data(&self) -> ExifData {
        ExifData::new(self.clone())
    }

    /// A view of the image's IPTC.
    pub fn iptc_data(&self) -> IptcData {
        IptcData::new(self.clone())
    }

    /// A view of the image's XMP.
    pub fn xmp_data(&self) -> XmpData {
        XmpData::new(self.clone())
    }

    /// Whether both handles refer to the same image.
    pub fn ptr_eq(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl core::fmt::Debug for Image {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state();
        f.debug_struct("Image")
            .field("format", &state.provider().magic_number())
            .field("origin", state.origin())
            .finish_non_exhaustive()
    }
}
