//! A cursor over the entries of one namespace.

use crate::{Image, container::Namespace, datum::Datum};

/// Yields each entry of a namespace, in order.
///
/// The iterator remembers which revision of the namespace it started on.
/// If the namespace is changed or re-read while iterating, it ends early
/// rather than yielding entries that have shifted around.
pub struct DatumIter<N: Namespace> {
    image: Image,
    index: usize,
    revision: u64,
    ended: bool,
    _namespace: core::marker::PhantomData<N>,
}

impl<N: Namespace> DatumIter<N> {
    pub(crate) fn new(image: Image) -> Self {
        let revision = image.state().revision(N::FORMAT);
        Self {
            image,
            index: 0,
            revision,
            ended: false,
            _namespace: core::marker::PhantomData,
        }
    }

    /// Whether [`Iterator::next`] would yield another entry.
    pub fn has_next(&self) -> bool {
        if self.ended {
            return false;
        }

        let state = self.image.state();
        state.revision(N::FORMAT) == self.revision
            && state
                .metadata()
                .is_some_and(|metadata| self.index < N::count(metadata))
    }
}

impl<N: Namespace> Iterator for DatumIter<N> {
    type Item = Datum<N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ended {
            return None;
        }

        let state = self.image.state();
        if state.revision(N::FORMAT) != self.revision {
            log::warn!(
                "`{}` changed while it was being iterated. Stopping after `{}` entries.",
                N::FORMAT,
                self.index
            );
            self.ended = true;
            return None;
        }

        let (key, value) = N::entry(state.metadata()?, self.index)?;
        drop(state);

        self.index += 1;
        Some(Datum::new(self.image.clone(), key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.ended {
            return (0, Some(0));
        }

        let state = self.image.state();
        let remaining = state
            .metadata()
            .map_or(0, |metadata| N::count(metadata).saturating_sub(self.index));
        (0, Some(remaining))
    }
}

impl<N: Namespace> core::iter::FusedIterator for DatumIter<N> {}

impl<N: Namespace> core::fmt::Debug for DatumIter<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatumIter")
            .field("format", &N::FORMAT)
            .field("index", &self.index)
            .field("revision", &self.revision)
            .field("ended", &self.ended)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Image, providers::jpeg::tests::jpeg, util::logger};

    fn image() -> Image {
        let image = Image::open_bytes(jpeg(&[])).unwrap();
        image.set_exif_string("Exif.Image.Make", "FakeMake").unwrap();
        image.set_exif_string("Exif.Image.Model", "FakeModel").unwrap();
        image
    }

    #[test]
    fn yields_every_entry_once() {
        logger();
        let image = image();
        let mut iter = image.exif_data().iter();

        assert!(iter.has_next());
        assert_eq!(iter.next().unwrap().to_string(), "FakeMake");
        assert!(iter.has_next());
        assert_eq!(iter.next().unwrap().to_string(), "FakeModel");
        assert!(!iter.has_next());

        // advancing past the end does nothing
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert!(!iter.has_next());
    }

    #[test]
    fn mutation_ends_iteration() {
        logger();
        let image = image();
        let mut iter = image.exif_data().iter();
        assert!(iter.next().is_some());

        image.exif_strip_key("Exif.Image.Make").unwrap();
        assert!(!iter.has_next());
        assert!(iter.next().is_none());

        // a fresh iterator sees the new state
        assert_eq!(image.exif_data().iter().count(), 1);
    }

    #[test]
    fn other_namespaces_dont_interfere() {
        logger();
        let image = image();
        let mut iter = image.exif_data().iter();
        assert!(iter.next().is_some());

        image.set_xmp_string("Xmp.dc.format", "image/jpeg").unwrap();
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
    }

    #[test]
    fn rereading_ends_iteration() {
        logger();
        let image = image();
        let mut iter = image.exif_data().iter();
        image.read_metadata().unwrap();
        assert!(iter.next().is_none());
    }
}
