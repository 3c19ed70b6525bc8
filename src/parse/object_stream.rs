use ::log::debug;

use super::byte_stream::ByteStream;
use super::error::ParseErr;
use super::error::ParseErrorCode;
use super::error::ParseResult;
use super::error::Position;
use super::object::ObjectParser;
use crate::context::Context;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::RawStream;
use crate::object::ObjectKind;
use crate::structure::object_stream::KEY_FIRST;
use crate::structure::object_stream::KEY_N;
use crate::tick::Ticker;
use crate::ObjectNumber;
use crate::Offset;

/// Expands the objects packed into an object stream.
/// REFERENCE: [7.5.7 Object streams, p64]
#[derive(Debug)]
pub(crate) struct ObjectStreamParser {
    parser: ObjectParser,
    first_offset: Offset,
    object_count: usize,
    already_parsed: bool,
}

mod convert {
    use super::*;

    impl ObjectStreamParser {
        /// Decode `stream` and read its `/First` and `/N` entries. `position`
        /// locates the stream in the document for error reports.
        pub(crate) fn for_stream(
            stream: &RawStream,
            context: &Context,
            cap_numbers: bool,
            position: Position,
        ) -> ParseResult<Self> {
            let on_err = |code: ParseErrorCode| ParseErr::new(position, code);
            let dict = stream.dict();
            let first_offset = dict
                .lookup(KEY_FIRST, context, &[ObjectKind::Number])
                .map_err(|err| on_err(err.into()))?
                .and_then(|first| first.as_number())
                .unwrap_or_default() as Offset;
            let object_count = dict
                .lookup(KEY_N, context, &[ObjectKind::Number])
                .map_err(|err| on_err(err.into()))?
                .and_then(|count| count.as_number())
                .unwrap_or_default() as usize;
            let decoded = stream.decode(context).map_err(|err| on_err(err.into()))?;
            Ok(Self {
                parser: ObjectParser::for_byte_stream(ByteStream::of(decoded), cap_numbers),
                first_offset,
                object_count,
                already_parsed: false,
            })
        }
    }
}

mod process {
    use super::*;

    impl ObjectStreamParser {
        /// Parse every packed object and assign it to `context` under its
        /// own object number, ticking once per object.
        pub(crate) fn parse_into_context(
            &mut self,
            context: &mut Context,
            ticker: &mut Ticker<'_>,
        ) -> ParseResult<()> {
            if self.already_parsed {
                return Err(ParseErr::new(
                    self.parser.bytes.position(),
                    ParseErrorCode::Reparse {
                        parser: stringify!(ObjectStreamParser),
                        method: stringify!(parse_into_context),
                    },
                ));
            }
            self.already_parsed = true;

            let offsets = self.parse_offsets_and_object_numbers()?;
            for &(object_number, offset) in offsets.iter() {
                let start = self
                    .first_offset
                    .checked_add(offset)
                    .filter(|&start| start <= self.parser.bytes.len())
                    .ok_or_else(|| {
                        ParseErr::new(
                            self.parser.bytes.position(),
                            ParseErrorCode::ObjectOffsetOutOfRange {
                                first: self.first_offset,
                                offset,
                            },
                        )
                    })?;
                self.parser.bytes.move_to(start);
                let object = self.parser.parse_object()?;
                context.assign(Reference::of(object_number, 0), object);
                ticker.tick(1);
            }
            debug!("Expanded an object stream of {} objects", offsets.len());
            Ok(())
        }

        /// The header pairs of object numbers and offsets relative to
        /// `/First`. A `/N` larger than the data allows fails on the first
        /// missing pair.
        fn parse_offsets_and_object_numbers(&mut self) -> ParseResult<Vec<(ObjectNumber, Offset)>> {
            let capacity = self.object_count.min(self.parser.remaining().len());
            let mut offsets = Vec::with_capacity(capacity);
            for _ in 0..self.object_count {
                self.parser.skip_whitespace_and_comments();
                let object_number = self.parser.parse_raw_int()?;
                self.parser.skip_whitespace_and_comments();
                let offset = self.parser.parse_raw_int()? as Offset;
                offsets.push((object_number, offset));
            }
            Ok(offsets)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::array::Array;
    use crate::object::direct::dictionary::Dictionary;
    use crate::object::direct::name::Name;
    use crate::object::indirect::stream::FlateStream;
    use crate::object::Object;
    use crate::structure::object_stream::ObjectStream;

    fn raw_object_stream(objects: Vec<(Reference, Object)>, encode: bool) -> RawStream {
        let stream = ObjectStream::with_objects(objects, encode);
        RawStream::of(stream.dict().clone(), FlateStream::contents(&stream).to_vec())
    }

    #[test]
    fn object_stream_parser_valid() {
        let objects = vec![
            (Reference::of(4, 0), Object::from(true)),
            (Reference::of(7, 0), Object::from(Array::new())),
            (Reference::of(12, 0), Object::from(Name::of("Hi"))),
        ];
        for encode in [false, true] {
            let stream = raw_object_stream(objects.clone(), encode);
            let mut context = Context::create();
            let mut ticker = Ticker::new(None, None);
            let mut parser =
                ObjectStreamParser::for_stream(&stream, &context, false, Position::default())
                    .unwrap();
            parser.parse_into_context(&mut context, &mut ticker).unwrap();
            assert_eq!(ticker.processed(), 3);
            assert_eq!(context.object_count(), 3);
            assert_eq!(context.largest_object_number(), 12);
            for (reference, object) in objects.iter() {
                assert_eq!(context.get(*reference), Some(object));
            }
        }
    }

    #[test]
    fn object_stream_parser_reparse() {
        let stream = raw_object_stream(vec![(Reference::of(1, 0), Object::Null)], false);
        let mut context = Context::create();
        let mut ticker = Ticker::new(None, None);
        let mut parser =
            ObjectStreamParser::for_stream(&stream, &context, false, Position::default()).unwrap();
        assert!(parser.parse_into_context(&mut context, &mut ticker).is_ok());
        let result = parser
            .parse_into_context(&mut context, &mut ticker)
            .map_err(|err| err.code().clone());
        assert_eq!(
            result,
            Err(ParseErrorCode::Reparse {
                parser: "ObjectStreamParser",
                method: "parse_into_context",
            })
        );
    }

    #[test]
    fn object_stream_parser_out_of_range() {
        let mut context = Context::create();
        let mut ticker = Ticker::new(None, None);

        // /N far beyond the header pairs present
        let mut dict = Dictionary::new();
        dict.set(KEY_N, 1e18);
        dict.set(KEY_FIRST, 4.0);
        let stream = RawStream::of(dict, b"1 0 null".to_vec());
        let mut parser =
            ObjectStreamParser::for_stream(&stream, &context, false, Position::default()).unwrap();
        let result = parser
            .parse_into_context(&mut context, &mut ticker)
            .map_err(|err| err.code().clone());
        assert!(matches!(result, Err(ParseErrorCode::NumberParsing(_))));

        // An offset past the end of the data
        let mut dict = Dictionary::new();
        dict.set(KEY_N, 1.0);
        dict.set(KEY_FIRST, 1e30);
        let stream = RawStream::of(dict, b"1 18446744073709551615 null".to_vec());
        let mut parser =
            ObjectStreamParser::for_stream(&stream, &context, false, Position::default()).unwrap();
        let result = parser
            .parse_into_context(&mut context, &mut ticker)
            .map_err(|err| err.code().clone());
        assert_eq!(
            result,
            Err(ParseErrorCode::ObjectOffsetOutOfRange {
                first: Offset::MAX,
                offset: 18_446_744_073_709_551_615,
            })
        );
        assert_eq!(context.object_count(), 0);
    }

    #[test]
    fn object_stream_parser_missing_first() {
        let mut dict = Dictionary::new();
        dict.set(KEY_N, 1.0);
        let stream = RawStream::of(dict, b"1 0 null".to_vec());
        let context = Context::create();
        let result = ObjectStreamParser::for_stream(&stream, &context, false, Position::default())
            .map(|_| ())
            .map_err(|err| err.code().clone());
        assert!(matches!(result, Err(ParseErrorCode::Object(_))));
    }
}
