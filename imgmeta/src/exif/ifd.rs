use winnow::{
    Parser,
    binary::{u16, u32},
    error::EmptyError,
};

use super::{
    NextIfdPointer, Stream,
    error::{ExifFatalError, ExifFieldError},
    value::parse_value,
};
use imgmeta_types::exif::Field;

/// An image file directory found within Exif metadata.
///
/// These contain a number of fields - at least one - and directions to the
/// next IFD.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub(super) struct Ifd {
    /// A list of fields on this IFD.
    pub fields: Vec<Result<Field, ExifFieldError>>,
}

/// Parses out an entire IFD.
pub(super) fn parse_ifd(input: &mut Stream) -> Result<(Ifd, NextIfdPointer), ExifFatalError> {
    let endianness = input.state.endianness;

    let entry_count: u16 = u16(endianness).parse_next(input).map_err(|_: EmptyError| {
        log::warn!("Couldn't find count on IFD - ran out of data!");
        ExifFatalError::IfdNoEntryCount
    })?;

    if entry_count == 0 {
        log::warn!("IFD reported itself as having zero fields!");
        return Err(ExifFatalError::IfdHadZeroFields);
    }

    log::trace!("Parsing `{entry_count}` fields...");
    let ifd = Ifd {
        fields: (0..entry_count).map(|_| parse_value(input)).collect(),
    };

    let next_ifd_location = {
        let raw_location: u32 = u32(endianness).parse_next(input).map_err(|_: EmptyError| {
            log::warn!("IFD didn't contain a pointer to the next IFD!");
            ExifFatalError::IfdNoPointer
        })?;

        if raw_location == 0_u32 {
            log::trace!("There won't be a next IFD.");
            None
        } else {
            log::trace!("Another IFD was detected! index: `{raw_location}`");
            Some(raw_location)
        }
    };

    Ok((ifd, next_ifd_location))
}

#[cfg(test)]
mod tests {
    use imgmeta_types::exif::{
        FieldData, FieldTag,
        ifd::IfdGroup,
        primitives::Primitive,
        tags::{Ifd0Tag, KnownTag},
    };
    use winnow::binary::Endianness as WinnowEndianness;

    use crate::{
        exif::{State, Stream, error::ExifFatalError},
        util::logger,
    };

    #[test]
    fn zero_fields_is_fatal() {
        logger();

        let bytes = [0_u8; 6];
        assert_eq!(
            super::parse_ifd(&mut Stream {
                input: &bytes,
                state: State {
                    current_ifd: IfdGroup::_0,
                    endianness: WinnowEndianness::Little,
                    blob: &bytes,
                },
            }),
            Err(ExifFatalError::IfdHadZeroFields)
        );
    }

    #[test]
    fn one_field_and_a_next_pointer() {
        logger();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1_u16.to_be_bytes());
        bytes.extend_from_slice(&0x0128_u16.to_be_bytes()); // ResolutionUnit
        bytes.extend_from_slice(&3_u16.to_be_bytes());
        bytes.extend_from_slice(&1_u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 2, 0, 0]);
        bytes.extend_from_slice(&64_u32.to_be_bytes());

        let (ifd, next) = super::parse_ifd(&mut Stream {
            input: &bytes,
            state: State {
                current_ifd: IfdGroup::_0,
                endianness: WinnowEndianness::Big,
                blob: &bytes,
            },
        })
        .unwrap();

        assert_eq!(next, Some(64));
        assert_eq!(ifd.fields.len(), 1);
        let field = ifd.fields[0].as_ref().unwrap();
        assert_eq!(
            field.tag,
            FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::ResolutionUnit))
        );
        assert_eq!(field.data, FieldData::Primitive(Primitive::Short(2)));
    }
}
