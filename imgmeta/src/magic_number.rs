//! Helps handle files without knowing their file type beforehand.
//!
//! Magic numbers (easy identifiers for a file format) tell us which provider
//! to parse a file with at runtime.
//!
//! # Usage
//!
//! ```
//! use imgmeta::magic_number::{AnyProvider, MagicNumber};
//!
//! // a tiny WebP: header, then one lossless 1x1 frame
//! let mut file = b"RIFF\x14\0\0\0WEBPVP8L\x07\0\0\0\x2f\0\0\0\0\x07\x10\0".to_vec();
//!
//! // the `get` function finds the `MagicNumber`. it does NOT parse the whole
//! // file!
//! let magic_num: Option<MagicNumber> = imgmeta::get(&file);
//! assert_eq!(magic_num, Some(MagicNumber::Webp));
//!
//! // on the other hand, `parse` finds the file type, then parses it for you
//! let parsed: AnyProvider = imgmeta::parse(&file).unwrap().unwrap();
//! assert_eq!(parsed.magic_number(), MagicNumber::Webp);
//! assert_eq!(parsed.dimensions(), Some((1, 1)));
//! ```

use crate::{
    error::CodecError,
    providers::{Provider, Rewrite, jpeg::Jpeg, webp::Webp},
};

/// Reminds contributors to add each provider to the `generate!()` call!
///
/// Do not implement this trait manually -- the `generate` macro will do it for
/// you! :D
#[doc(hidden)]
#[diagnostic::on_unimplemented(
    message = "Please add this type to the `generate!()` macro in the `imgmeta/src/magic_number.rs` file."
)]
pub trait _MagicNumberMarker {
    #[doc(hidden)]
    fn _do_not_implement_this_manually(self);
}

/// This macro generates three enums and some implementations.
///
/// # Enums + Implementations
///
/// - `MagicNumber`: a representation of which format is present.
/// - `AnyProvider`: a parsed file of any format.
/// - `AnyConstructionError`: why a recognized file failed to parse.
macro_rules! generate {
    ( $(
        // name of the provider (must be the same as the provider_ty)
        $variant:ident => {
            // the actual type we map to
            provider_ty: $provider_ty:ty,
            name: $name:literal,
            mime_type: $mime_type:literal
        },
    )+) => {
        /// A magic number.
        ///
        /// Each one represents one of the supported image formats.
        #[repr(u16)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum MagicNumber {
            $($variant,)+
        }

        /// A wrapper for "any" provider.
        ///
        /// You must check what's inside to use it directly.
        #[derive(Clone, Debug)]
        pub enum AnyProvider {
            $($variant($provider_ty),)+
        }

        /// A file matched a magic number, but failed to parse as that format.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum AnyConstructionError {
            $($variant(<$provider_ty as Provider>::ConstructionError),)+
        }

        impl MagicNumber {
            /// Attempts to find the magic number of a given file.
            #[inline(always)]
            pub fn new(input: &impl AsRef<[u8]>) -> Option<Self> {
                get(input)
            }

            /// The format's usual name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// The format's MIME type.
            pub const fn mime_type(&self) -> &'static str {
                match self {
                    $(Self::$variant => $mime_type,)+
                }
            }
        }

        impl core::fmt::Display for MagicNumber {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl AnyConstructionError {
            /// The format the file was recognized as.
            pub fn magic_number(&self) -> MagicNumber {
                match self {
                    $(Self::$variant(..) => MagicNumber::$variant,)+
                }
            }
        }

        impl core::fmt::Display for AnyConstructionError {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(Self::$variant(e) => write!(f, "{}: {e}", $name),)+
                }
            }
        }

        impl core::error::Error for AnyConstructionError {}

        impl AnyProvider {
            /// Uses the magic number of a file to parse it.
            ///
            /// Returns `None` if the format isn't supported. Malformed files
            /// of a supported format give `Some(Err(..))`.
            #[inline(always)]
            pub fn new(input: &impl AsRef<[u8]>) -> Option<Result<Self, AnyConstructionError>> {
                parse(input)
            }

            /// Returns the [`MagicNumber`] of this provider.
            pub fn magic_number(&self) -> MagicNumber {
                match self {
                    $(Self::$variant(..) => MagicNumber::$variant,)+
                }
            }

            /// See [`Provider::dimensions`].
            pub fn dimensions(&self) -> Option<(u32, u32)> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::dimensions(inner),)+
                }
            }

            /// See [`Provider::icc_profile`].
            pub fn icc_profile(&self) -> Option<Vec<u8>> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::icc_profile(inner),)+
                }
            }

            /// See [`Provider::exif_raw`].
            pub fn exif_raw(&self) -> Option<&[u8]> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::exif_raw(inner),)+
                }
            }

            /// See [`Provider::iptc_raw`].
            pub fn iptc_raw(&self) -> Option<&[u8]> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::iptc_raw(inner),)+
                }
            }

            /// See [`Provider::xmp_raw`].
            pub fn xmp_raw(&self) -> Option<&[u8]> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::xmp_raw(inner),)+
                }
            }

            /// See [`Provider::supports_iptc`].
            pub fn supports_iptc(&self) -> bool {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::supports_iptc(inner),)+
                }
            }

            /// See [`Provider::rebuild`].
            pub fn rebuild(&self, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError> {
                match self {
                    $(Self::$variant(inner) => <$provider_ty as Provider>::rebuild(inner, rewrite),)+
                }
            }
        }

        // implement `From<SomeProvider>` for both
        $(
            impl From<$provider_ty> for AnyProvider {
                fn from(item: $provider_ty) -> Self {
                    Self::$variant(item)
                }
            }

            impl _MagicNumberMarker for $provider_ty {
                fn _do_not_implement_this_manually(self) {}
            }
        )+

        impl From<&AnyProvider> for MagicNumber {
            fn from(item: &AnyProvider) -> MagicNumber {
                item.magic_number()
            }
        }

        // create the `parse` function (for `imgmeta::parse`)
        pub(super) fn parse(input: &impl AsRef<[u8]>) -> Option<Result<AnyProvider, AnyConstructionError>> {
            let slice_input: &[u8] = input.as_ref();

            // check each provider to see if it matches
            $(
                ::log::trace!("Attempting to parse blob as `{}`...", core::any::type_name::<$provider_ty>());
                if <$provider_ty as Provider>::magic_number(slice_input) {
                    return Some(
                        <$provider_ty as Provider>::new(slice_input)
                            .map(AnyProvider::from)
                            .map_err(|e| {
                                ::log::error!("Blob looked like `{}`, but didn't parse. err: {e}", $name);
                                AnyConstructionError::$variant(e)
                            }),
                    );
                }
                ::log::trace!("Not `{}`!", core::any::type_name::<$provider_ty>());
            )+

            // if none of the providers match, return `None`
            ::log::trace!("No providers matched the blob.");
            None
        }

        // now, create `get`
        pub(super) fn get(input: &impl AsRef<[u8]>) -> Option<MagicNumber> {
            let slice_input: &[u8] = input.as_ref();

            $(
                if <$provider_ty as Provider>::magic_number(slice_input) {
                    return Some(MagicNumber::$variant);
                }
            )+

            ::log::trace!("No providers matched the blob.");
            None
        }
    };
}

generate!(
    Jpeg => { provider_ty: Jpeg, name: "JPEG", mime_type: "image/jpeg" },
    Webp => { provider_ty: Webp, name: "WebP", mime_type: "image/webp" },
);
