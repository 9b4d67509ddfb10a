#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WebpConstructionError {
    /// The file didn't start with a `RIFF`/`WEBP` header.
    NoHeader,

    /// The standard requires at least one chunk, but there were none.
    NoChunks,

    /// The `VP8X` chunk was too short to hold its flags and canvas size.
    MalformedExtendedHeader,

    /// No `VP8 `, `VP8L` or `ANMF` chunk was found.
    NoImageData,
}

impl core::fmt::Display for WebpConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::NoHeader => "The file has no `RIFF`/`WEBP` header.",
            Self::NoChunks => "The WebP file has no readable chunks.",
            Self::MalformedExtendedHeader => "The WebP `VP8X` chunk is malformed.",
            Self::NoImageData => "The WebP file has no image data chunk.",
        })
    }
}

impl core::error::Error for WebpConstructionError {}
