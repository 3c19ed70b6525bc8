pub mod stream;

use ::log::debug;
use ::std::borrow::Cow;
use ::std::num::NonZeroUsize;

use crate::context::Context;
use crate::header::Header;
use crate::object::direct::dictionary::Dictionary;
use crate::object::indirect::reference::Reference;
use crate::object::Object;
use crate::object::Serialize;
use crate::parse::KW_ENDOBJ;
use crate::parse::KW_OBJ;
use crate::tick::Checkpoint;
use crate::tick::Ticker;
use crate::xref::CrossRefSection;
use crate::xref::Trailer;
use crate::xref::TrailerDict;
use crate::xref::KEY_ENCRYPT;
use crate::xref::KEY_ID;
use crate::xref::KEY_INFO;
use crate::xref::KEY_ROOT;
use crate::xref::KEY_SIZE;
use crate::Byte;

const DEFAULT_OBJECTS_PER_STREAM: usize = 50;

/// Options shared by both writers. `encode_streams` and
/// `objects_per_stream` only affect `PdfStreamWriter`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WriteOptions {
    objects_per_tick: Option<NonZeroUsize>,
    encode_streams: bool,
    objects_per_stream: NonZeroUsize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            objects_per_tick: None,
            encode_streams: true,
            objects_per_stream: NonZeroUsize::new(DEFAULT_OBJECTS_PER_STREAM)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl WriteOptions {
    /// Zero disables yielding.
    pub fn objects_per_tick(mut self, objects_per_tick: usize) -> Self {
        self.objects_per_tick = NonZeroUsize::new(objects_per_tick);
        self
    }

    pub fn encode_streams(mut self, encode_streams: bool) -> Self {
        self.encode_streams = encode_streams;
        self
    }

    /// Zero is treated as one.
    pub fn objects_per_stream(mut self, objects_per_stream: usize) -> Self {
        self.objects_per_stream = NonZeroUsize::new(objects_per_stream).unwrap_or(NonZeroUsize::MIN);
        self
    }
}

/// The objects to write in order, together with the file's closing
/// sections.
#[derive(Debug)]
pub(crate) struct Layout<'a> {
    pub(crate) size: usize,
    pub(crate) header: Header,
    pub(crate) indirect_objects: Vec<(Reference, Cow<'a, Object>)>,
    pub(crate) xref: Option<CrossRefSection>,
    pub(crate) trailer_dict: Option<TrailerDict>,
    pub(crate) trailer: Trailer,
}

/// REFERENCE: [7.5 File structure, p53-58]
/// Serializes a context with a classic cross-reference table. Objects are
/// written in ascending object-number order.
#[derive(Debug)]
pub struct PdfWriter<'a> {
    context: &'a Context,
    options: WriteOptions,
    ticker: Ticker<'a>,
}

mod convert {
    use super::*;

    impl<'a> PdfWriter<'a> {
        pub fn for_context(context: &'a Context, options: WriteOptions) -> Self {
            Self {
                context,
                options,
                ticker: Ticker::new(options.objects_per_tick, None),
            }
        }

        pub fn with_checkpoint(mut self, checkpoint: Checkpoint<'a>) -> Self {
            self.ticker = Ticker::new(self.options.objects_per_tick, Some(checkpoint));
            self
        }

        /// The number of objects accounted for so far, over both passes.
        pub fn processed_objects(&self) -> usize {
            self.ticker.processed()
        }
    }
}

mod process {
    use super::*;

    impl<'a> PdfWriter<'a> {
        pub fn serialize_to_buffer(&mut self) -> Vec<Byte> {
            let layout = self.compute_buffer_size();
            write_layout(layout, &mut self.ticker)
        }

        fn compute_buffer_size(&mut self) -> Layout<'a> {
            let header = self.context.header();
            let mut size = header.size_in_bytes() + 2;
            let mut xref = CrossRefSection::create();
            let indirect_objects = self.context.enumerate_indirect_objects();
            for (reference, object) in indirect_objects.iter() {
                xref.add_entry(*reference, size);
                size += indirect_object_size(*reference, object);
                self.ticker.tick(1);
            }
            let xref_offset = size;
            size += xref.size_in_bytes() + 1;
            let trailer_dict = TrailerDict::of(trailer_dict(self.context));
            size += trailer_dict.size_in_bytes() + 2;
            let trailer = Trailer::for_last_cross_ref_section_offset(xref_offset);
            size += trailer.size_in_bytes();
            debug!(
                "Writing {} objects with a cross-reference table at {}",
                indirect_objects.len(),
                xref_offset
            );
            Layout {
                size,
                header,
                indirect_objects: indirect_objects
                    .into_iter()
                    .map(|(reference, object)| (reference, Cow::Borrowed(object)))
                    .collect(),
                xref: Some(xref),
                trailer_dict: Some(trailer_dict),
                trailer,
            }
        }
    }

    /// The bytes taken by `N G obj\n`, the object and `\nendobj\n\n`.
    pub(crate) fn indirect_object_size(reference: Reference, object: &Object) -> usize {
        object_header(reference).len() + object.size_in_bytes() + KW_ENDOBJ.len() + 3
    }

    fn object_header(reference: Reference) -> String {
        format!(
            "{} {} {}\n",
            reference.object_number(),
            reference.generation_number(),
            KW_OBJ
        )
    }

    /// `/Size` followed by the trailer entries the context holds.
    pub(crate) fn trailer_dict(context: &Context) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set(KEY_SIZE, (context.largest_object_number() + 1) as f64);
        let trailer_info = context.trailer_info();
        for (key, entry) in [
            (KEY_ROOT, &trailer_info.root),
            (KEY_ENCRYPT, &trailer_info.encrypt),
            (KEY_INFO, &trailer_info.info),
            (KEY_ID, &trailer_info.id),
        ] {
            if let Some(value) = entry {
                dict.set(key, value.clone());
            }
        }
        dict
    }

    pub(crate) fn write_layout(layout: Layout<'_>, ticker: &mut Ticker<'_>) -> Vec<Byte> {
        let mut buffer = Vec::with_capacity(layout.size);
        layout.header.copy_bytes_into(&mut buffer);
        buffer.extend_from_slice(b"\n\n");
        for (reference, object) in layout.indirect_objects.iter() {
            buffer.extend_from_slice(object_header(*reference).as_bytes());
            object.copy_bytes_into(&mut buffer);
            buffer.push(b'\n');
            buffer.extend_from_slice(KW_ENDOBJ.as_bytes());
            buffer.extend_from_slice(b"\n\n");
            let count = match object.as_ref() {
                Object::ObjectStream(stream) => stream.objects_count(),
                _ => 1,
            };
            ticker.tick(count);
        }
        if let Some(xref) = layout.xref.as_ref() {
            xref.copy_bytes_into(&mut buffer);
            buffer.push(b'\n');
        }
        if let Some(trailer_dict) = layout.trailer_dict.as_ref() {
            trailer_dict.copy_bytes_into(&mut buffer);
            buffer.extend_from_slice(b"\n\n");
        }
        layout.trailer.copy_bytes_into(&mut buffer);
        debug_assert_eq!(buffer.len(), layout.size);
        buffer
    }
}

pub(crate) use self::process::indirect_object_size;
pub(crate) use self::process::trailer_dict;
pub(crate) use self::process::write_layout;

#[cfg(test)]
mod tests {
    use ::std::cell::Cell;

    use super::*;
    use crate::object::direct::array::Array;
    use crate::object::direct::string::literal::Literal;
    use crate::pdf::PdfParser;

    fn sample_context() -> Context {
        let mut context = Context::create();
        context.set_header(Header::for_version(1, 4));
        let string = context.register(Literal::of(b"Hello".to_vec()));
        let array: Array = [Object::from(1.0), string.into()].into_iter().collect();
        let array = context.register(array);
        context.trailer_info_mut().info = Some(array.into());
        context
    }

    #[test]
    fn pdf_writer_layout() {
        let context = sample_context();
        let buffer = PdfWriter::for_context(&context, WriteOptions::default()).serialize_to_buffer();
        let expected = b"%PDF-1.4\n%\x81\x81\x81\x81\n\n\
            1 0 obj\n(Hello)\nendobj\n\n\
            2 0 obj\n[ 1 1 0 R ]\nendobj\n\n\
            xref\n0 3\n\
            0000000000 65535 f \n\
            0000000016 00000 n \n\
            0000000040 00000 n \n\
            \n\
            trailer\n<<\n/Size 3\n/Info 2 0 R\n>>\n\n\
            startxref\n68\n%%EOF";
        assert_eq!(
            String::from_utf8_lossy(&buffer),
            String::from_utf8_lossy(expected)
        );
    }

    #[test]
    fn pdf_writer_round_trip() {
        let context = sample_context();
        let buffer = PdfWriter::for_context(&context, WriteOptions::default()).serialize_to_buffer();
        let mut parser = PdfParser::for_bytes(buffer);
        let parsed = parser.parse_document().unwrap();
        assert_eq!(parsed.header(), context.header());
        assert_eq!(parsed.enumerate_indirect_objects(), context.enumerate_indirect_objects());
        assert_eq!(parsed.trailer_info(), context.trailer_info());
        let offsets: Vec<_> = parser.cross_ref_sections()[0]
            .entries()
            .map(|entry| entry.offset)
            .collect();
        assert_eq!(offsets, vec![0, 16, 40]);
    }

    #[test]
    fn pdf_writer_ticks() {
        let context = sample_context();
        let calls = Cell::new(0);
        let options = WriteOptions::default().objects_per_tick(1);
        let mut writer = PdfWriter::for_context(&context, options)
            .with_checkpoint(Box::new(|_| calls.set(calls.get() + 1)));
        writer.serialize_to_buffer();
        // Both passes visit every object
        assert_eq!(writer.processed_objects(), 4);
        drop(writer);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn write_options_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.objects_per_tick, None);
        assert!(options.encode_streams);
        assert_eq!(options.objects_per_stream.get(), 50);
        let options = options.objects_per_stream(0).encode_streams(false);
        assert_eq!(options.objects_per_stream.get(), 1);
        assert!(!options.encode_streams);
    }
}
