use winnow::{
    Parser as _, Stateful,
    binary::{Endianness as WinnowEndianness, i8, i16, i32, u8, u16, u32},
    error::EmptyError,
    token::take,
};

use super::{
    Stream,
    error::{ExifFieldError, ExifFieldResult},
};
use imgmeta_types::exif::{Field, FieldData, FieldTag, primitives::*};

/// Parses out one value from an IFD.
pub(super) fn parse_value(input: &mut Stream) -> ExifFieldResult<Field> {
    let endianness = input.state.endianness;

    // grab tag (2 bytes)
    let tag: FieldTag = {
        let raw_tag: u16 = u16(endianness)
            .parse_next(&mut input.input)
            .map_err(|_: EmptyError| ExifFieldError::FieldNoTag)?;

        FieldTag::new(input.state.current_ifd, raw_tag)
    };

    // type (2 bytes)
    let ty: PrimitiveTy = {
        let raw_ty: u16 = u16(endianness)
            .parse_next(&mut input.input)
            .map_err(|_: EmptyError| ExifFieldError::FieldNoTy)?;

        PrimitiveTy::try_from(raw_ty).map_err(|_| {
            log::warn!("Encountered unknown field type: `{raw_ty}`");
            ExifFieldError::FieldUnknownType { got: raw_ty }
        })?
    };

    // count (4 bytes)
    let count: u32 = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoCount)?;

    // value or offset (4 bytes), decided below
    let value_or_offset: [u8; 4] = take(4_usize)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoOffsetOrValue)?
        .try_into()
        .map_err(|_| ExifFieldError::FieldNoOffsetOrValue)?;
    let offset: u32 = match endianness {
        WinnowEndianness::Big => u32::from_be_bytes(value_or_offset),
        _ => u32::from_le_bytes(value_or_offset),
    };

    log::trace!(
        "(field info...
    tag: {tag},
    ty: {ty:?},
    count: {count},
    value or offset: {offset}
)"
    );

    if let FieldTag::Known(known_tag) = tag {
        if !known_tag.types().contains(&ty) {
            log::debug!(
                "Field `{known_tag:?}` had an unexpected type. Keeping it anyway. \
                got: `{ty:?}`, expected: {:?}",
                known_tag.types()
            );
        }
    }

    // values wider than four bytes live elsewhere in the blob
    let total_size: u64 = ty.size_bytes() as u64 * count as u64;
    let data: &[u8] = if total_size > 4 {
        let start = offset as usize;
        let end = start.saturating_add(total_size as usize);
        input.state.blob.get(start..end).ok_or_else(|| {
            log::warn!(
                "Field `{tag}` said its data is stored outside the blob! \
                offset: `{offset}`, size: `{total_size}`, blob len: `{}`",
                input.state.blob.len()
            );
            ExifFieldError::OffsetTooFar { offset }
        })?
    } else {
        value_or_offset.as_slice()
    };

    let prim_stream = &mut PrimitiveStream {
        input: data,
        state: PrimitiveState {
            tag: &tag,
            endianness,
            count,
            ty,
        },
    };

    let field_data = match count {
        0_u32 => FieldData::None(ty),
        1_u32 => FieldData::Primitive(parse_primitive(prim_stream)?),
        _ => FieldData::List {
            list: parse_primitive_list(prim_stream)?,
            ty,
        },
    };

    Ok(Field {
        tag,
        data: field_data,
    })
}

#[derive(Clone, Debug)]
pub(super) struct PrimitiveState<'s> {
    tag: &'s FieldTag,
    endianness: WinnowEndianness,
    count: u32,
    ty: PrimitiveTy,
}
pub(super) type PrimitiveStream<'s> = Stateful<&'s [u8], PrimitiveState<'s>>;

/// Parses a list of primitives.
fn parse_primitive_list(input: &mut PrimitiveStream) -> ExifFieldResult<Vec<Primitive>> {
    let mut v: Vec<Primitive> = Vec::with_capacity(input.state.count as usize);

    for i in 0..input.state.count {
        v.push(parse_primitive(input).inspect_err(|e| {
            log::warn!(
                "Failed to create primitive #{i} on {}. err: {e}",
                input.state.tag
            )
        })?);
    }

    Ok(v)
}

/// Parses a single primitive.
fn parse_primitive(input: &mut PrimitiveStream) -> ExifFieldResult<Primitive> {
    let e = input.state.endianness;
    let ty = input.state.ty;
    let outta_data = |_: EmptyError| ExifFieldError::OuttaData { ty };

    Ok(match ty {
        PrimitiveTy::Byte => Primitive::Byte(u8.parse_next(input).map_err(outta_data)?),
        PrimitiveTy::Ascii => Primitive::Ascii(u8.parse_next(input).map_err(outta_data)?),
        PrimitiveTy::Undefined => Primitive::Undefined(u8.parse_next(input).map_err(outta_data)?),
        PrimitiveTy::SByte => Primitive::SByte(i8.parse_next(input).map_err(outta_data)?),
        PrimitiveTy::Short => Primitive::Short(u16(e).parse_next(input).map_err(outta_data)?),
        PrimitiveTy::SShort => Primitive::SShort(i16(e).parse_next(input).map_err(outta_data)?),
        PrimitiveTy::Long => Primitive::Long(u32(e).parse_next(input).map_err(outta_data)?),
        PrimitiveTy::SLong => Primitive::SLong(i32(e).parse_next(input).map_err(outta_data)?),

        PrimitiveTy::Rational => Primitive::Rational(Rational {
            numerator: u32(e).parse_next(input).map_err(outta_data)?,
            denominator: u32(e).parse_next(input).map_err(outta_data)?,
        }),

        PrimitiveTy::SRational => Primitive::SRational(SRational {
            numerator: i32(e).parse_next(input).map_err(outta_data)?,
            denominator: i32(e).parse_next(input).map_err(outta_data)?,
        }),

        PrimitiveTy::Float => Primitive::Float(f32::from_bits(
            u32(e).parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::Double => {
            let raw: u64 = winnow::binary::u64(e)
                .parse_next(input)
                .map_err(outta_data)?;
            Primitive::Double(f64::from_bits(raw))
        }
    })
}

#[cfg(test)]
mod tests {
    use imgmeta_types::exif::{
        Field, FieldData, FieldTag,
        ifd::IfdGroup,
        primitives::{Primitive, PrimitiveTy, SRational},
    };
    use winnow::binary::Endianness as WinnowEndianness;

    use crate::{
        exif::{
            State, Stream,
            error::ExifFieldError,
            value::{PrimitiveState, PrimitiveStream},
        },
        util::logger,
    };

    /// Unknown types should be rejected.
    #[test]
    fn unknown_type() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(0_u16.to_le_bytes().as_slice()); // field tag id
        backing_bytes.extend_from_slice(0_u16.to_le_bytes().as_slice()); // field type
        backing_bytes.extend_from_slice(1_u32.to_le_bytes().as_slice()); // field count
        backing_bytes.extend_from_slice(0_u32.to_le_bytes().as_slice()); // data

        assert_eq!(
            super::parse_value(&mut Stream {
                input: &backing_bytes,
                state: State {
                    current_ifd: IfdGroup::_0,
                    endianness: WinnowEndianness::Little,
                    blob: &backing_bytes,
                }
            }),
            Err(ExifFieldError::FieldUnknownType { got: 0_u16 })
        );
    }

    /// We should accept a long, unknown field.
    #[test]
    fn long_field() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(666_u16.to_le_bytes().as_slice()); // field tag id
        backing_bytes.extend_from_slice(1_u16.to_le_bytes().as_slice()); // field type
        backing_bytes.extend_from_slice(300_u32.to_le_bytes().as_slice()); // field count
        backing_bytes.extend_from_slice(
            (backing_bytes.len() as u32 + 20_u32)
                .to_le_bytes()
                .as_slice(),
        ); // "the data is in 20 more bytes, including me"
        backing_bytes.extend_from_slice([0_u8; 16].as_slice()); // 16 bytes of padding
        backing_bytes.extend_from_slice([61_u8; 300].as_slice()); // field data

        assert_eq!(
            super::parse_value(&mut Stream {
                input: &backing_bytes,
                state: State {
                    endianness: WinnowEndianness::Little,
                    blob: &backing_bytes,
                    current_ifd: IfdGroup::_0,
                }
            }),
            Ok(Field {
                tag: FieldTag::Unknown(666_u16),
                data: FieldData::List {
                    list: [Primitive::Byte(61_u8); 300].into(),
                    ty: PrimitiveTy::Byte
                }
            })
        );
    }

    /// Offsets past the end of the blob fail the field, not the blob.
    #[test]
    fn offset_past_blob() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(0x010f_u16.to_be_bytes().as_slice());
        backing_bytes.extend_from_slice(2_u16.to_be_bytes().as_slice());
        backing_bytes.extend_from_slice(40_u32.to_be_bytes().as_slice());
        backing_bytes.extend_from_slice(9000_u32.to_be_bytes().as_slice());

        assert_eq!(
            super::parse_value(&mut Stream {
                input: &backing_bytes,
                state: State {
                    endianness: WinnowEndianness::Big,
                    blob: &backing_bytes,
                    current_ifd: IfdGroup::_0,
                }
            }),
            Err(ExifFieldError::OffsetTooFar { offset: 9000 })
        );
    }

    #[test]
    fn primitives_should_parse_under_le_and_be() {
        logger();

        for endianness in [WinnowEndianness::Big, WinnowEndianness::Little] {
            let big = endianness == WinnowEndianness::Big;
            let u16b = |v: u16| if big { v.to_be_bytes() } else { v.to_le_bytes() };
            let i16b = |v: i16| if big { v.to_be_bytes() } else { v.to_le_bytes() };
            let u32b = |v: u32| if big { v.to_be_bytes() } else { v.to_le_bytes() };
            let i32b = |v: i32| if big { v.to_be_bytes() } else { v.to_le_bytes() };

            let mut srational = i32b(-1).to_vec();
            srational.extend_from_slice(&i32b(3));

            for (ty, value, expected_result) in [
                (PrimitiveTy::Byte, vec![4_u8], Primitive::Byte(4_u8)),
                (PrimitiveTy::Ascii, b"c".to_vec(), Primitive::Ascii(b'c')),
                (PrimitiveTy::SByte, vec![0xff], Primitive::SByte(-1)),
                (
                    PrimitiveTy::Short,
                    u16b(u16::MAX).to_vec(),
                    Primitive::Short(u16::MAX),
                ),
                (PrimitiveTy::SShort, i16b(-7).to_vec(), Primitive::SShort(-7)),
                (PrimitiveTy::Long, u32b(45).to_vec(), Primitive::Long(45)),
                (PrimitiveTy::Undefined, vec![10], Primitive::Undefined(10)),
                (
                    PrimitiveTy::SLong,
                    i32b(-2025).to_vec(),
                    Primitive::SLong(-2025),
                ),
                (
                    PrimitiveTy::Float,
                    u32b(1.5_f32.to_bits()).to_vec(),
                    Primitive::Float(1.5),
                ),
                (
                    PrimitiveTy::SRational,
                    srational,
                    Primitive::SRational(SRational {
                        numerator: -1,
                        denominator: 3,
                    }),
                ),
            ] {
                log::info!("completing value: ({ty:?}, `{value:x?}`)");

                let mut prim_stream = PrimitiveStream {
                    input: value.as_slice(),
                    state: PrimitiveState {
                        tag: &FieldTag::Unknown(0),
                        endianness,
                        count: 1,
                        ty,
                    },
                };

                let parsed_primitive = super::parse_primitive(&mut prim_stream).unwrap();

                assert_eq!(parsed_primitive.ty(), ty, "types should match");
                assert_eq!(
                    parsed_primitive, expected_result,
                    "reality should match expectation"
                );
            }
        }
    }
}
