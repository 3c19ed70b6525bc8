use ::log::debug;
use ::log::warn;

use super::byte_stream::ByteStream;
use super::error::ParseErr;
use super::error::ParseErrorCode;
use super::error::ParseResult;
use super::error::Position;
use super::num::bytes_to_u64;
use crate::context::Context;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::RawStream;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::xref::CrossRefEntry;
use crate::xref::KEY_ENCRYPT;
use crate::xref::KEY_ID;
use crate::xref::KEY_INDEX;
use crate::xref::KEY_INFO;
use crate::xref::KEY_ROOT;
use crate::xref::KEY_SIZE;
use crate::xref::KEY_W;
use crate::GenerationNumber;
use crate::ObjectNumber;
use crate::Offset;

/// Fields are read into a `u64`.
const MAX_FIELD_WIDTH: usize = 8;

/// Reads the entries packed into a cross-reference stream.
/// REFERENCE: [7.5.8 Cross-reference streams, p65-68]
#[derive(Debug)]
pub(crate) struct XRefStreamParser {
    dict: Dictionary,
    bytes: ByteStream,
    // Pairs of first object number and length
    subsections: Vec<(ObjectNumber, usize)>,
    widths: [usize; 3],
    already_parsed: bool,
}

mod convert {
    use super::*;

    impl XRefStreamParser {
        /// Decode `stream` and read its `/Index` and `/W` entries. Without
        /// `/Index`, a single subsection spans `[0, /Size)`.
        pub(crate) fn for_stream(
            stream: &RawStream,
            context: &Context,
            position: Position,
        ) -> ParseResult<Self> {
            let on_err = |code: ParseErrorCode| ParseErr::new(position, code);
            let dict = stream.dict();
            let size = dict
                .lookup(KEY_SIZE, context, &[ObjectKind::Number])
                .map_err(|err| on_err(err.into()))?
                .and_then(Object::as_number)
                .unwrap_or_default();
            let subsections = match dict.lookup(KEY_INDEX, context, &[]) {
                Ok(Some(Object::Array(index))) => {
                    read_subsections(index, context).map_err(|err| on_err(err.into()))?
                }
                _ => vec![(0, size as usize)],
            };
            for &(first, length) in subsections.iter() {
                if first.checked_add(length as ObjectNumber).is_none() {
                    return Err(on_err(ParseErrorCode::SubsectionOutOfRange {
                        first,
                        length: length as u64,
                    }));
                }
            }
            let widths = dict
                .lookup(KEY_W, context, &[ObjectKind::Array])
                .map_err(|err| on_err(err.into()))?
                .and_then(Object::as_array)
                .map(|w| read_widths(w, context))
                .transpose()
                .map_err(|err| on_err(err.into()))?
                .unwrap_or_default();
            if let Some(&width) = widths.iter().find(|&&width| width > MAX_FIELD_WIDTH) {
                return Err(on_err(ParseErrorCode::FieldWidthOutOfRange(width)));
            }
            let decoded = stream.decode(context).map_err(|err| on_err(err.into()))?;
            Ok(Self {
                dict: dict.clone(),
                bytes: ByteStream::of(decoded),
                subsections,
                widths,
                already_parsed: false,
            })
        }
    }

    fn number_at(array: &Array, index: usize, context: &Context) -> ObjectResult<f64> {
        array
            .lookup(index, context, &[ObjectKind::Number])?
            .and_then(Object::as_number)
            .ok_or(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Number],
                actual: None,
            })
    }

    fn read_subsections(index: &Array, context: &Context) -> ObjectResult<Vec<(ObjectNumber, usize)>> {
        (0..index.size() / 2)
            .map(|idx| {
                let first = number_at(index, 2 * idx, context)?;
                let length = number_at(index, 2 * idx + 1, context)?;
                Ok((first as ObjectNumber, length as usize))
            })
            .collect()
    }

    /// Missing widths count as zero.
    fn read_widths(w: &Array, context: &Context) -> ObjectResult<[usize; 3]> {
        let mut widths = [0; 3];
        for (idx, width) in widths.iter_mut().enumerate().take(w.size()) {
            *width = number_at(w, idx, context)? as usize;
        }
        Ok(widths)
    }
}

mod process {
    use super::*;

    impl XRefStreamParser {
        /// Record the trailer entries of the stream dictionary in `context`
        /// and return the decoded entries. Entries in earlier sections are
        /// kept where the stream omits them.
        pub(crate) fn parse_into_context(
            &mut self,
            context: &mut Context,
        ) -> ParseResult<Vec<CrossRefEntry>> {
            if self.already_parsed {
                return Err(ParseErr::new(
                    self.bytes.position(),
                    ParseErrorCode::Reparse {
                        parser: stringify!(XRefStreamParser),
                        method: stringify!(parse_into_context),
                    },
                ));
            }
            self.already_parsed = true;

            let trailer_info = context.trailer_info_mut();
            for (key, entry) in [
                (KEY_ROOT, &mut trailer_info.root),
                (KEY_ENCRYPT, &mut trailer_info.encrypt),
                (KEY_INFO, &mut trailer_info.info),
                (KEY_ID, &mut trailer_info.id),
            ] {
                if let Some(value) = self.dict.get(key) {
                    *entry = Some(value.clone());
                }
            }
            let entries = self.parse_entries();
            debug!("Cross-reference stream with {} entries", entries.len());
            Ok(entries)
        }

        /// REFERENCE: [Table 18 — Entries in a cross-reference stream, p67]
        /// A zero type width means every entry has type 1. Entries of unknown
        /// types are skipped.
        fn parse_entries(&mut self) -> Vec<CrossRefEntry> {
            let [type_width, second_width, third_width] = self.widths;
            let mut entries = Vec::new();
            // Without any field, no entry is stored in the data
            if type_width + second_width + third_width == 0 {
                return entries;
            }
            for (first, length) in self.subsections.clone() {
                let end = first.saturating_add(length as ObjectNumber);
                for object_number in first..end {
                    let fields = (
                        self.read_field(type_width),
                        self.read_field(second_width),
                        self.read_field(third_width),
                    );
                    let (Some(kind), Some(second), Some(third)) = fields else {
                        warn!(
                            "Cross-reference stream data ends before the entry of object {}",
                            object_number
                        );
                        return entries;
                    };
                    let kind = if type_width == 0 { 1 } else { kind };
                    let entry = match kind {
                        0 => CrossRefEntry::Deleted {
                            reference: Reference::of(object_number, third as GenerationNumber),
                            next_free: second,
                        },
                        1 => CrossRefEntry::Uncompressed {
                            reference: Reference::of(object_number, third as GenerationNumber),
                            offset: second as Offset,
                        },
                        2 => CrossRefEntry::Compressed {
                            reference: Reference::of(object_number, 0),
                            object_stream: Reference::of(second, 0),
                            index: third as usize,
                        },
                        _ => continue,
                    };
                    entries.push(entry);
                }
            }
            entries
        }

        /// A big-endian field of `width` bytes.
        fn read_field(&mut self, width: usize) -> Option<u64> {
            let start = self.bytes.offset();
            let end = start
                .checked_add(width)
                .filter(|&end| end <= self.bytes.len())?;
            self.bytes.advance(width);
            bytes_to_u64(self.bytes.slice(start, end))
        }
    }
}
