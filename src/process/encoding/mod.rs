pub(crate) mod date;

use crate::Byte;

/// Code points of the PDFDocEncoding bytes that differ from Latin-1.
/// REFERENCE: [Table D.2 — Latin character set and encodings, p656-659]
const PDF_DOC_0X18: [char; 8] = [
    '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}', '\u{02DC}',
];
const PDF_DOC_0X80: [char; 31] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}',
];

/// REFERENCE: [7.9.2.2 Text string type, p116]
pub(crate) fn has_utf16_bom(bytes: &[Byte]) -> bool {
    matches!(bytes, [0xFE, 0xFF, ..] | [0xFF, 0xFE, ..])
}

/// Decode UTF-16 text led by a byte order mark. Unpaired surrogates become
/// U+FFFD and a trailing odd byte is dropped.
pub(crate) fn utf16_decode(bytes: &[Byte]) -> String {
    let (big_endian, rest) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        rest => (true, rest),
    };
    let units = rest.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// UTF-16BE code units of `text`, led by the byte order mark.
pub(crate) fn utf16_encode(text: &str) -> Vec<u16> {
    ::std::iter::once(0xFEFF).chain(text.encode_utf16()).collect()
}

pub(crate) fn pdf_doc_decode(bytes: &[Byte]) -> String {
    bytes.iter().map(|&byte| pdf_doc_char(byte)).collect()
}

fn pdf_doc_char(byte: Byte) -> char {
    match byte {
        0x18..=0x1F => PDF_DOC_0X18[usize::from(byte - 0x18)],
        0x80..=0x9E => PDF_DOC_0X80[usize::from(byte - 0x80)],
        0xA0 => '\u{20AC}',
        _ => char::from(byte),
    }
}

/// Decode a text string: UTF-16 when a byte order mark is present,
/// PDFDocEncoding otherwise.
pub(crate) fn decode_text(bytes: &[Byte]) -> String {
    if has_utf16_bom(bytes) {
        utf16_decode(bytes)
    } else {
        pdf_doc_decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_text_pdf_doc() {
        assert_eq!(decode_text(b"Hello"), "Hello");
        assert_eq!(decode_text(&[0x80, 0x20, 0x92, 0xA0, 0xE9]), "\u{2022} \u{2122}\u{20AC}\u{E9}");
        assert_eq!(decode_text(&[0x18, 0x1F]), "\u{02D8}\u{02DC}");
    }

    #[test]
    fn decode_text_utf16() {
        assert_eq!(decode_text(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_text(&[0xFF, 0xFE, 0x48, 0x00, 0x69, 0x00]), "Hi");
        // Surrogate pair
        assert_eq!(decode_text(&[0xFE, 0xFF, 0xD8, 0x3D, 0xDE, 0x00]), "\u{1F600}");
        assert_eq!(decode_text(&[0xFE, 0xFF, 0xD8, 0x3D]), "\u{FFFD}");
    }

    #[test]
    fn utf16_encode_valid() {
        assert_eq!(utf16_encode("A\u{1F600}"), vec![0xFEFF, 0x0041, 0xD83D, 0xDE00]);
    }
}
