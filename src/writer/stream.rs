use ::log::debug;
use ::std::borrow::Cow;

use super::indirect_object_size;
use super::trailer_dict;
use super::write_layout;
use super::Layout;
use super::WriteOptions;
use crate::context::Context;
use crate::object::indirect::reference::Reference;
use crate::object::Object;
use crate::object::Serialize;
use crate::structure::object_stream::ObjectStream;
use crate::tick::Checkpoint;
use crate::tick::Ticker;
use crate::xref::CrossRefStream;
use crate::xref::Trailer;
use crate::xref::KEY_SIZE;
use crate::Byte;

/// REFERENCE: [7.5.7 Object streams, p64] and [7.5.8 Cross-reference
/// streams, p65-68]
/// Serializes a context with its objects packed into object streams and a
/// cross-reference stream in place of the table and trailer dictionary. The
/// context is left untouched: object and cross-reference streams take the
/// object numbers following its largest one.
#[derive(Debug)]
pub struct PdfStreamWriter<'a> {
    context: &'a Context,
    options: WriteOptions,
    ticker: Ticker<'a>,
}

mod convert {
    use super::*;

    impl<'a> PdfStreamWriter<'a> {
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

        pub fn processed_objects(&self) -> usize {
            self.ticker.processed()
        }
    }
}

mod process {
    use super::*;

    impl<'a> PdfStreamWriter<'a> {
        pub fn serialize_to_buffer(&mut self) -> Vec<Byte> {
            let layout = self.compute_buffer_size();
            write_layout(layout, &mut self.ticker)
        }

        /// Streams, invalid objects, the encryption dictionary and objects
        /// with a nonzero generation number cannot live in object streams.
        fn must_stay_uncompressed(&self, reference: Reference, object: &Object) -> bool {
            self.context.trailer_info().encrypt == Some(Object::Reference(reference))
                || object.is_stream()
                || matches!(object, Object::Invalid(_))
                || reference.generation_number() != 0
        }

        fn compute_buffer_size(&mut self) -> Layout<'a> {
            let context = self.context;
            let encode = self.options.encode_streams;
            let objects_per_stream = self.options.objects_per_stream.get();
            let mut object_number = context.largest_object_number() + 1;
            let header = context.header();
            let mut size = header.size_in_bytes() + 2;
            let mut xref_stream = CrossRefStream::create(trailer_dict(context), encode);

            let mut uncompressed_objects = Vec::new();
            let mut compressed_objects: Vec<Vec<(Reference, Object)>> = Vec::new();
            let mut object_stream_refs = Vec::new();
            for (reference, object) in context.enumerate_indirect_objects() {
                if self.must_stay_uncompressed(reference, object) {
                    xref_stream.add_uncompressed_entry(reference, size);
                    size += indirect_object_size(reference, object);
                    uncompressed_objects.push((reference, Cow::Borrowed(object)));
                    self.ticker.tick(1);
                    continue;
                }
                let is_full = compressed_objects
                    .last()
                    .map_or(true, |chunk| chunk.len() == objects_per_stream);
                if is_full {
                    object_stream_refs.push(Reference::of(object_number, 0));
                    object_number += 1;
                    compressed_objects.push(Vec::with_capacity(objects_per_stream));
                }
                let (Some(chunk), Some(&object_stream)) =
                    (compressed_objects.last_mut(), object_stream_refs.last())
                else {
                    continue;
                };
                xref_stream.add_compressed_entry(reference, object_stream, chunk.len());
                chunk.push((reference, object.clone()));
            }

            let object_stream_count = compressed_objects.len();
            for (chunk, reference) in compressed_objects.into_iter().zip(object_stream_refs) {
                let count = chunk.len();
                let object_stream = Object::from(ObjectStream::with_objects(chunk, encode));
                xref_stream.add_uncompressed_entry(reference, size);
                size += indirect_object_size(reference, &object_stream);
                uncompressed_objects.push((reference, Cow::Owned(object_stream)));
                self.ticker.tick(count);
            }

            let xref_stream_ref = Reference::of(object_number, 0);
            object_number += 1;
            xref_stream
                .dict_mut()
                .set(KEY_SIZE, object_number as f64);
            xref_stream.add_uncompressed_entry(xref_stream_ref, size);
            let xref_offset = size;
            let xref_stream = Object::from(xref_stream);
            size += indirect_object_size(xref_stream_ref, &xref_stream);
            uncompressed_objects.push((xref_stream_ref, Cow::Owned(xref_stream)));

            let trailer = Trailer::for_last_cross_ref_section_offset(xref_offset);
            size += trailer.size_in_bytes();
            debug!(
                "Writing {} objects in {} object streams with a cross-reference stream at {}",
                uncompressed_objects.len(),
                object_stream_count,
                xref_offset
            );
            Layout {
                size,
                header,
                indirect_objects: uncompressed_objects,
                xref: None,
                trailer_dict: None,
                trailer,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ::std::cell::Cell;

    use super::*;
    use crate::object::direct::dictionary::Dictionary;
    use crate::object::direct::name::Name;
    use crate::object::indirect::invalid::Invalid;
    use crate::object::indirect::stream::RawStream;
    use crate::pdf::PdfParser;
    use crate::xref::CrossRefEntry;

    fn sample_context() -> Context {
        let mut context = Context::create();
        for number in 1..=5 {
            context.register(Object::from(number as f64));
        }
        let mut dict = Dictionary::new();
        dict.set("Kind", Name::of("Sample"));
        dict.set("Length", 9.0);
        context.register(RawStream::of(dict, b"raw bytes".to_vec()));
        context.assign(Reference::of(7, 2), Object::from(true));
        context.register(Invalid::of(b"<< broken".to_vec()));
        let encrypt = context.register(Dictionary::new());
        context.trailer_info_mut().encrypt = Some(encrypt.into());
        context
    }

    #[test]
    fn pdf_stream_writer_round_trip() {
        let context = sample_context();
        for encode in [false, true] {
            let options = WriteOptions::default().encode_streams(encode).objects_per_stream(2);
            let buffer = PdfStreamWriter::for_context(&context, options).serialize_to_buffer();
            let mut parser = PdfParser::for_bytes(buffer);
            let parsed = parser.parse_document().unwrap();
            let without_invalid = |context: &Context| -> Vec<(Reference, Object)> {
                context
                    .enumerate_indirect_objects()
                    .into_iter()
                    .filter(|(_, object)| !matches!(object, Object::Invalid(_)))
                    .map(|(reference, object)| (reference, object.clone()))
                    .collect()
            };
            assert_eq!(without_invalid(&parsed), without_invalid(&context));
            // The bytes up to `endobj` include the line break written after
            // the object
            assert_eq!(
                parsed.get(Reference::of(8, 0)),
                Some(&Invalid::of(b"<< broken\n".to_vec()).into())
            );
            assert_eq!(parsed.trailer_info(), context.trailer_info());
            assert_eq!(parsed.header(), context.header());

            let entries = parser.cross_ref_stream_entries();
            // The free-list head, nine objects, three object streams and the
            // cross-reference stream
            assert_eq!(entries.len(), 14);
            assert_eq!(
                entries.iter().filter(|entry| matches!(entry, CrossRefEntry::Compressed { .. })).count(),
                5
            );
            assert_eq!(
                entries[5],
                CrossRefEntry::Compressed {
                    reference: Reference::of(5, 0),
                    object_stream: Reference::of(12, 0),
                    index: 0,
                }
            );
            assert_eq!(entries.last().map(CrossRefEntry::reference), Some(Reference::of(13, 0)));
        }
    }

    #[test]
    fn pdf_stream_writer_keeps_context() {
        let context = sample_context();
        let before = context.clone();
        let _ = PdfStreamWriter::for_context(&context, WriteOptions::default()).serialize_to_buffer();
        assert_eq!(context.largest_object_number(), before.largest_object_number());
        assert_eq!(context.object_count(), before.object_count());
    }

    #[test]
    fn pdf_stream_writer_ticks() {
        let context = sample_context();
        let calls = Cell::new(0);
        let options = WriteOptions::default().objects_per_tick(3);
        let mut writer = PdfStreamWriter::for_context(&context, options)
            .with_checkpoint(Box::new(|_| calls.set(calls.get() + 1)));
        writer.serialize_to_buffer();
        // Four uncompressed objects and one object stream of five on each
        // pass, plus the cross-reference stream when written
        assert_eq!(writer.processed_objects(), 19);
        drop(writer);
        assert_eq!(calls.get(), 4);
    }
}
