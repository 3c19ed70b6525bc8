pub mod hexadecimal;
pub mod literal;

use ::chrono::DateTime;
use ::chrono::FixedOffset;

use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::process::encoding::date::parse_date;
use crate::process::encoding::decode_text;
use crate::Byte;

/// Decode the bytes of a string as text and read it as a date.
pub(crate) fn decode_date(bytes: &[Byte]) -> ObjectResult<DateTime<FixedOffset>> {
    let text = decode_text(bytes);
    parse_date(&text).ok_or(ObjectErr::InvalidDate(text))
}
