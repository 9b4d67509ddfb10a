use crate::{
    MetadataFormat,
    error::{CodecError, CodecErrorKind, Error},
    magic_number::AnyProvider,
    metadata::{Dirty, Metadata},
};

use super::Origin;

/// Everything an [`Image`](super::Image) handle shares.
#[derive(Debug)]
pub(crate) struct ImageState {
    origin: Origin,

    /// The current serialization. Holds the original bytes until the first
    /// flush.
    buffer: Vec<u8>,

    /// The layout of `buffer`.
    provider: AnyProvider,

    /// `None` until metadata is read or first mutated.
    metadata: Option<Metadata>,

    /// Namespaces changed since `buffer` was written.
    dirty: Dirty,

    /// Bumped on every change to a namespace, indexed by format.
    revisions: [u64; 3],
}

impl ImageState {
    pub fn new(origin: Origin, buffer: Vec<u8>, provider: AnyProvider) -> Self {
        Self {
            origin,
            buffer,
            provider,
            metadata: None,
            dirty: Dirty::default(),
            revisions: [0; 3],
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The last written serialization. Pending changes aren't in it.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn provider(&self) -> &AnyProvider {
        &self.provider
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn revision(&self, format: MetadataFormat) -> u64 {
        self.revisions[format as usize]
    }

    fn bump(&mut self, format: MetadataFormat) {
        self.revisions[format as usize] += 1;
    }

    /// Whether there are changes `buffer` doesn't have yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty.any()
    }

    /// Writes pending changes into the buffer.
    ///
    /// On failure, the buffer and the pending changes are left as they were.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        if !self.dirty.any() {
            return Ok(());
        }
        let Some(ref metadata) = self.metadata else {
            self.dirty = Dirty::default();
            return Ok(());
        };

        log::debug!("Flushing changed metadata: {:?}", self.dirty);
        let encoded = metadata.encode(self.dirty);
        let bytes = self.provider.rebuild(&encoded.rewrite())?;

        let provider = match AnyProvider::new(&bytes) {
            Some(Ok(provider)) => provider,
            Some(Err(e)) => {
                log::error!("Rebuilt image doesn't parse! err: {e}");
                return Err(CodecError::new(
                    CodecErrorKind::WriteFailed,
                    format!("Failed to write image data: {e}"),
                ));
            }
            None => {
                log::error!("Rebuilt image isn't recognizable!");
                return Err(CodecError::new(
                    CodecErrorKind::WriteFailed,
                    "Failed to write image data",
                ));
            }
        };

        log::trace!("Image is now `{}` bytes long.", bytes.len());
        self.buffer = bytes;
        self.provider = provider;
        self.dirty = Dirty::default();
        Ok(())
    }

    /// The current serialization, with every change applied.
    pub fn bytes(&mut self) -> Result<&[u8], CodecError> {
        self.flush()?;
        Ok(&self.buffer)
    }

    /// Flushes, then parses every namespace from the buffer.
    pub fn read_metadata(&mut self) -> Result<(), CodecError> {
        self.flush()?;
        let metadata = Metadata::load(&self.provider)?;

        self.metadata = Some(metadata);
        for format in [MetadataFormat::Exif, MetadataFormat::Iptc, MetadataFormat::Xmp] {
            self.bump(format);
        }
        Ok(())
    }

    /// Loads metadata if it hasn't been yet.
    pub fn ensure_loaded(&mut self) -> Result<&mut Metadata, CodecError> {
        let metadata = match self.metadata.take() {
            Some(metadata) => metadata,
            None => {
                log::debug!("Loading metadata before its first change.");
                Metadata::load(&self.provider)?
            }
        };
        Ok(self.metadata.insert(metadata))
    }

    /// Runs a change against one namespace.
    ///
    /// The namespace is only marked as changed when `change` succeeds and
    /// the result can still be written into the image. Otherwise the metadata
    /// is put back the way it was.
    pub fn mutate<T>(
        &mut self,
        format: MetadataFormat,
        change: impl FnOnce(&mut Metadata) -> Result<T, CodecError>,
    ) -> Result<T, Error> {
        let metadata = self.ensure_loaded()?;
        let before = metadata.clone();

        let checked = change(metadata).and_then(|out| self.check_fits(format).map(|()| out));
        match checked {
            Ok(out) => {
                self.dirty.mark(format);
                self.bump(format);
                Ok(out)
            }
            Err(e) => {
                self.metadata = Some(before);
                Err(e.into())
            }
        }
    }

    /// Checks that a namespace can still be written into the container.
    ///
    /// Limits like JPEG's 64 KiB segments only show up when the container is
    /// rebuilt, so this does a throwaway rebuild with just that namespace.
    fn check_fits(&self, format: MetadataFormat) -> Result<(), CodecError> {
        let Some(metadata) = self.metadata.as_ref() else {
            return Ok(());
        };

        let mut only = Dirty::default();
        only.mark(format);
        let encoded = metadata.encode(only);
        self.provider.rebuild(&encoded.rewrite()).map(|_| ()).map_err(|e| {
            log::error!("Changed `{format}` no longer fits in the image. err: {e}");
            e
        })
    }
}
