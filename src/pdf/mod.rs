use ::log::debug;
use ::log::warn;
use ::std::mem;
use ::std::num::NonZeroUsize;

use crate::context::Context;
use crate::header::Header;
use crate::object::direct::name::Name;
use crate::object::indirect::invalid::Invalid;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::RawStream;
use crate::object::Object;
use crate::parse::character_set::is_digit;
use crate::parse::error::ParseErr;
use crate::parse::error::ParseErrorCode;
use crate::parse::error::ParseResult;
use crate::parse::object::ObjectParser;
use crate::parse::object_stream::ObjectStreamParser;
use crate::parse::xref_stream::XRefStreamParser;
use crate::parse::KW_ENDOBJ;
use crate::parse::KW_EOF;
use crate::parse::KW_HEADER;
use crate::parse::KW_OBJ;
use crate::parse::KW_STARTXREF;
use crate::parse::KW_TRAILER;
use crate::parse::KW_XREF;
use crate::structure::object_stream::VAL_OBJ_STM;
use crate::structure::KEY_TYPE;
use crate::structure::VAL_CATALOG;
use crate::tick::Checkpoint;
use crate::tick::Ticker;
use crate::xref::section::section_line;
use crate::xref::section::SectionLine;
use crate::xref::CrossRefEntry;
use crate::xref::CrossRefSection;
use crate::xref::Trailer;
use crate::xref::KEY_ENCRYPT;
use crate::xref::KEY_ID;
use crate::xref::KEY_INFO;
use crate::xref::KEY_ROOT;
use crate::xref::VAL_XREF;
use crate::Byte;
use crate::GenerationNumber;
use crate::ObjectNumber;
use crate::Offset;

/// Options of `PdfParser`. By default, the parser never yields, wraps
/// objects it fails to parse as invalid objects and keeps numbers above
/// 2^53 - 1 as they are.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ParseOptions {
    objects_per_tick: Option<NonZeroUsize>,
    throw_on_invalid_object: bool,
    cap_numbers: bool,
}

impl ParseOptions {
    /// Call the checkpoint after every `objects_per_tick` objects. Zero
    /// disables yielding.
    pub fn objects_per_tick(mut self, objects_per_tick: usize) -> Self {
        self.objects_per_tick = NonZeroUsize::new(objects_per_tick);
        self
    }

    pub fn throw_on_invalid_object(mut self, throw_on_invalid_object: bool) -> Self {
        self.throw_on_invalid_object = throw_on_invalid_object;
        self
    }

    pub fn cap_numbers(mut self, cap_numbers: bool) -> Self {
        self.cap_numbers = cap_numbers;
        self
    }
}

/// REFERENCE: [7.5 File structure, p53-68]
/// Reads a whole document front to back into a `Context`. Sections are
/// parsed as they appear, so cross-reference offsets only serve
/// diagnostics.
#[derive(Debug)]
pub struct PdfParser<'a> {
    parser: ObjectParser,
    context: Context,
    options: ParseOptions,
    ticker: Ticker<'a>,
    already_parsed: bool,
    cross_ref_sections: Vec<CrossRefSection>,
    cross_ref_stream_entries: Vec<CrossRefEntry>,
    trailers: Vec<Trailer>,
}

mod convert {
    use super::*;

    impl<'a> PdfParser<'a> {
        pub fn for_bytes(bytes: impl Into<Vec<Byte>>) -> Self {
            Self::for_bytes_with_options(bytes, ParseOptions::default())
        }

        pub fn for_bytes_with_options(bytes: impl Into<Vec<Byte>>, options: ParseOptions) -> Self {
            Self {
                parser: ObjectParser::for_bytes(bytes, options.cap_numbers),
                context: Context::create(),
                options,
                ticker: Ticker::new(options.objects_per_tick, None),
                already_parsed: false,
                cross_ref_sections: Vec::new(),
                cross_ref_stream_entries: Vec::new(),
                trailers: Vec::new(),
            }
        }

        /// Call `checkpoint` at each yield point with the number of objects
        /// parsed so far.
        pub fn with_checkpoint(mut self, checkpoint: Checkpoint<'a>) -> Self {
            self.ticker = Ticker::new(self.options.objects_per_tick, Some(checkpoint));
            self
        }

        pub fn options(&self) -> ParseOptions {
            self.options
        }

        /// The classic cross-reference sections read so far.
        pub fn cross_ref_sections(&self) -> &[CrossRefSection] {
            &self.cross_ref_sections
        }

        /// The entries decoded from cross-reference streams so far.
        pub fn cross_ref_stream_entries(&self) -> &[CrossRefEntry] {
            &self.cross_ref_stream_entries
        }

        /// The `startxref` footers read so far.
        pub fn trailers(&self) -> &[Trailer] {
            &self.trailers
        }

        /// The number of objects parsed so far, counting those expanded from
        /// object streams.
        pub fn parsed_objects(&self) -> usize {
            self.ticker.processed()
        }
    }
}

mod process {
    use super::*;

    impl PdfParser<'_> {
        pub fn parse_document(&mut self) -> ParseResult<Context> {
            if self.already_parsed {
                return Err(ParseErr::new(
                    self.parser.bytes.position(),
                    ParseErrorCode::Reparse {
                        parser: stringify!(PdfParser),
                        method: stringify!(parse_document),
                    },
                ));
            }
            self.already_parsed = true;

            let header = self.parse_header()?;
            debug!("Header: {}", header);
            self.context.set_header(header);

            let mut prev_offset = None;
            while !self.parser.bytes.done() {
                self.parse_document_section()?;
                let offset = self.parser.bytes.offset();
                if prev_offset == Some(offset) {
                    return Err(ParseErr::new(
                        self.parser.bytes.position(),
                        ParseErrorCode::StalledParser,
                    ));
                }
                prev_offset = Some(offset);
            }

            self.maybe_recover_root();
            let free_list_head = Reference::of(0, 0);
            if self.context.get(free_list_head).is_some() {
                warn!("Removing parsed object: {}", free_list_head);
                self.context.delete(free_list_head);
            }
            Ok(mem::take(&mut self.context))
        }

        /// Point the trailer `/Root` at the last catalog in the document when
        /// it does not refer to one.
        fn maybe_recover_root(&mut self) {
            let root = self.context.trailer_info().root.as_ref();
            let catalog = root.and_then(|root| self.context.lookup(root, &[]).ok().flatten());
            if catalog.map_or(false, is_valid_catalog) {
                return;
            }
            let recovered = self
                .context
                .enumerate_indirect_objects()
                .into_iter()
                .filter(|(_, object)| is_valid_catalog(object))
                .map(|(reference, _)| reference)
                .last();
            if let Some(reference) = recovered {
                warn!("Trailer /Root does not refer to a catalog. Using {}", reference);
                self.context.trailer_info_mut().root = Some(reference.into());
            }
        }

        /// REFERENCE: [7.5.2 File header, p54]
        fn parse_header(&mut self) -> ParseResult<Header> {
            while !self.parser.bytes.done() {
                if self.parser.match_keyword(KW_HEADER) {
                    let major = self.parser.parse_raw_int()?;
                    self.parser.bytes.assert_next(b'.')?;
                    let minor = self.parser.parse_raw_int()?;
                    self.skip_binary_header_comment();
                    return Ok(Header::for_version(major, minor));
                }
                self.parser.bytes.next_byte();
            }
            Err(ParseErr::new(
                self.parser.bytes.position(),
                ParseErrorCode::MissingPdfHeader,
            ))
        }

        /// The binary comment after the header is not always preceded by `%`
        /// nor made of bytes above 127. Anything up to the first indirect
        /// object header is dropped.
        fn skip_binary_header_comment(&mut self) {
            self.parser.skip_whitespace_and_comments();
            let initial_offset = self.parser.bytes.offset();
            let found = self.parse_indirect_object_header().is_ok();
            self.parser.bytes.move_to(initial_offset);
            if !found {
                self.parser.bytes.next_byte();
                self.parser.skip_whitespace_and_comments();
            }
        }

        fn parse_indirect_object_header(&mut self) -> ParseResult<Reference> {
            self.parser.skip_whitespace_and_comments();
            let object_number = self.parser.parse_raw_int()?;
            self.parser.skip_whitespace_and_comments();
            let generation_number = self.parser.parse_raw_int()?;
            self.parser.skip_whitespace_and_comments();
            if !self.parser.match_keyword(KW_OBJ) {
                return Err(ParseErr::new(
                    self.parser.bytes.position(),
                    ParseErrorCode::MissingKeyword(KW_OBJ),
                ));
            }
            let generation_number =
                GenerationNumber::try_from(generation_number).unwrap_or(GenerationNumber::MAX);
            Ok(Reference::of(object_number, generation_number))
        }

        fn match_indirect_object_header(&mut self) -> bool {
            let initial_offset = self.parser.bytes.offset();
            if self.parse_indirect_object_header().is_ok() {
                return true;
            }
            self.parser.bytes.move_to(initial_offset);
            false
        }

        /// REFERENCE: [7.3.10 Indirect objects, p33]
        /// Object streams are expanded into the context and cross-reference
        /// streams are only read for their entries. Neither is kept.
        fn parse_indirect_object(&mut self) -> ParseResult<Reference> {
            let reference = self.parse_indirect_object_header()?;
            self.parser.skip_whitespace_and_comments();
            let position = self.parser.bytes.position();
            let object = self.parser.parse_object()?;
            self.parser.skip_whitespace_and_comments();
            self.parser.match_keyword(KW_ENDOBJ);

            match object {
                Object::RawStream(stream) if has_type(&stream, VAL_OBJ_STM) => {
                    ObjectStreamParser::for_stream(
                        &stream,
                        &self.context,
                        self.options.cap_numbers,
                        position,
                    )?
                    .parse_into_context(&mut self.context, &mut self.ticker)?;
                }
                Object::RawStream(stream) if has_type(&stream, VAL_XREF) => {
                    let entries = XRefStreamParser::for_stream(&stream, &self.context, position)?
                        .parse_into_context(&mut self.context)?;
                    self.cross_ref_stream_entries.extend(entries);
                }
                object => self.context.assign(reference, object),
            }
            Ok(reference)
        }

        /// Wrap the bytes up to the next `endobj` as an invalid object, unless
        /// invalid objects are not tolerated.
        fn parse_invalid_indirect_object(&mut self, cause: ParseErr) -> ParseResult<Reference> {
            let start_position = self.parser.bytes.position();
            if self.options.throw_on_invalid_object {
                return Err(ParseErr::new(
                    start_position,
                    ParseErrorCode::InvalidObject(Box::new(cause)),
                ));
            }
            warn!(
                "Trying to parse invalid object at {}. Error: {}",
                start_position, cause
            );
            let reference = self.parse_indirect_object_header()?;
            self.parser.skip_whitespace_and_comments();
            let start = self.parser.bytes.offset();
            let mut found = false;
            while !self.parser.bytes.done() {
                if self.parser.match_keyword(KW_ENDOBJ) {
                    found = true;
                    break;
                }
                self.parser.bytes.next_byte();
            }
            if !found {
                return Err(ParseErr::new(
                    start_position,
                    ParseErrorCode::InvalidObjectParsing,
                ));
            }
            let end = self.parser.bytes.offset() - KW_ENDOBJ.len();
            let invalid = Invalid::of(self.parser.bytes.slice(start, end));
            warn!("Invalid object {} kept as {} raw bytes", reference, end - start);
            self.context.assign(reference, invalid);
            Ok(reference)
        }

        fn parse_indirect_objects(&mut self) -> ParseResult<()> {
            self.parser.skip_whitespace_and_comments();
            while matches!(self.parser.bytes.peek(), Some(byte) if is_digit(byte)) {
                let initial_offset = self.parser.bytes.offset();
                if let Err(err) = self.parse_indirect_object() {
                    self.parser.bytes.move_to(initial_offset);
                    self.parse_invalid_indirect_object(err)?;
                }
                self.parser.skip_whitespace_and_comments();
                self.skip_jibberish();
                self.ticker.tick(1);
            }
            Ok(())
        }

        /// REFERENCE: [7.5.4 Cross-reference table, p55-57]
        fn maybe_parse_cross_ref_section(&mut self) -> ParseResult<Option<CrossRefSection>> {
            self.parser.skip_whitespace_and_comments();
            if !self.parser.match_keyword(KW_XREF) {
                return Ok(None);
            }
            self.parser.skip_whitespace_and_comments();

            let mut object_number: ObjectNumber = 0;
            let mut section = CrossRefSection::create_empty();
            while let Ok((remains, line)) = section_line(self.parser.remaining()) {
                let count = self.parser.remaining().len() - remains.len();
                self.parser.bytes.advance(count);
                match line {
                    SectionLine::Entry {
                        offset,
                        generation_number,
                        deleted,
                    } => {
                        let reference = Reference::of(object_number, generation_number);
                        if deleted {
                            section.add_deleted_entry(reference, offset);
                        } else {
                            section.add_entry(reference, offset as Offset);
                        }
                        object_number = object_number.saturating_add(1);
                    }
                    SectionLine::Subsection(first) => object_number = first,
                }
                self.parser.skip_whitespace_and_comments();
            }
            debug!(
                "Cross-reference section with {} entries",
                section.entries().count()
            );
            Ok(Some(section))
        }

        /// REFERENCE: [7.5.5 File trailer, p58]
        /// Entries missing from this trailer keep the values of earlier ones.
        fn maybe_parse_trailer_dict(&mut self) -> ParseResult<()> {
            self.parser.skip_whitespace_and_comments();
            if !self.parser.match_keyword(KW_TRAILER) {
                return Ok(());
            }
            self.parser.skip_whitespace_and_comments();
            let dict = self.parser.parse_dict()?;
            let trailer_info = self.context.trailer_info_mut();
            for (key, entry) in [
                (KEY_ROOT, &mut trailer_info.root),
                (KEY_ENCRYPT, &mut trailer_info.encrypt),
                (KEY_INFO, &mut trailer_info.info),
                (KEY_ID, &mut trailer_info.id),
            ] {
                if let Some(value) = dict.get(key) {
                    *entry = Some(value.clone());
                }
            }
            Ok(())
        }

        fn maybe_parse_trailer(&mut self) -> ParseResult<Option<Trailer>> {
            self.parser.skip_whitespace_and_comments();
            if !self.parser.match_keyword(KW_STARTXREF) {
                return Ok(None);
            }
            self.parser.skip_whitespace_and_comments();
            let offset = self.parser.parse_raw_int()? as Offset;
            // `%%EOF` would otherwise be skipped as a comment
            self.parser.skip_whitespace();
            self.parser.match_keyword(KW_EOF);
            self.parser.skip_whitespace_and_comments();
            self.parser.match_keyword(KW_EOF);
            self.parser.skip_whitespace_and_comments();
            Ok(Some(Trailer::for_last_cross_ref_section_offset(offset)))
        }

        fn parse_document_section(&mut self) -> ParseResult<()> {
            self.parse_indirect_objects()?;
            if let Some(section) = self.maybe_parse_cross_ref_section()? {
                self.cross_ref_sections.push(section);
            }
            self.maybe_parse_trailer_dict()?;
            if let Some(trailer) = self.maybe_parse_trailer()? {
                self.trailers.push(trailer);
            }
            self.skip_jibberish();
            Ok(())
        }

        /// Skip stray bytes up to the next indirect object header, `xref`,
        /// `trailer` or `startxref`.
        fn skip_jibberish(&mut self) {
            self.parser.skip_whitespace_and_comments();
            let start = self.parser.bytes.offset();
            while let Some(byte) = self.parser.bytes.peek() {
                let initial_offset = self.parser.bytes.offset();
                if (b' '..=b'~').contains(&byte)
                    && (self.parser.match_keyword(KW_XREF)
                        || self.parser.match_keyword(KW_TRAILER)
                        || self.parser.match_keyword(KW_STARTXREF)
                        || self.match_indirect_object_header())
                {
                    self.parser.bytes.move_to(initial_offset);
                    break;
                }
                self.parser.bytes.next_byte();
            }
            let skipped = self.parser.bytes.offset() - start;
            if skipped > 0 {
                warn!("Skipped {} unexpected bytes at offset {}", skipped, start);
            }
        }
    }

    fn has_type(stream: &RawStream, value: &str) -> bool {
        stream.dict().get(KEY_TYPE).and_then(Object::as_name) == Some(&Name::of(value))
    }

    fn is_valid_catalog(object: &Object) -> bool {
        object
            .as_dictionary()
            .and_then(|dict| dict.get(KEY_TYPE))
            .and_then(Object::as_name)
            == Some(&Name::of(VAL_CATALOG))
    }
}
