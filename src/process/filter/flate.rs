use ::flate2::read::ZlibDecoder;
use ::std::io::Read;

use self::error::FlErrorCode;
use super::Filter;
use crate::process::filter::error::FilterResult;
use crate::Byte;
use crate::DECODED_LIMIT;

/// REFERENCE: [7.4.4 LZWDecode and FlateDecode filters, p38]
/// zlib/deflate decompression filter.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub(crate) struct Fl;

impl Filter for Fl {
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        let mut decoded = Vec::new();
        // Read one byte past the limit to detect oversized streams
        let mut decoder = ZlibDecoder::new(bytes).take(DECODED_LIMIT as u64 + 1);
        decoder
            .read_to_end(&mut decoded)
            .map_err(|err| FlErrorCode::Decode(err.to_string()))?;
        if decoded.len() > DECODED_LIMIT {
            return Err(FlErrorCode::TooLarge.into());
        }
        Ok(decoded)
    }
}

pub(crate) mod error {
    use ::thiserror::Error;

    use crate::DECODED_LIMIT;

    #[derive(Debug, Error, PartialEq, Clone)]
    pub enum FlErrorCode {
        // flate2 only reports io errors
        #[error("Decoding: {0}")]
        Decode(String),
        #[error("Too large: Exceeding the set limit of {} bytes", DECODED_LIMIT)]
        TooLarge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err_eq;
    use crate::object::indirect::stream::deflate;
    use crate::process::filter::error::FilterErr;

    #[test]
    fn flate_valid() {
        let encoded = deflate(b"BT /F1 12 Tf (Hello) Tj ET\n");
        assert_eq!(Fl.decode(&encoded), Ok(b"BT /F1 12 Tf (Hello) Tj ET\n".to_vec()));
        assert_eq!(Fl.decode(&deflate(b"")), Ok(Vec::new()));
    }

    #[test]
    fn flate_invalid() {
        let result = Fl.decode(b"not a zlib stream");
        let expected_error: FilterErr =
            FlErrorCode::Decode("corrupt deflate stream".to_string()).into();
        assert_err_eq!(result, expected_error);
    }
}
