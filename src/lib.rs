mod convert;
mod fmt;
mod tick;

pub mod context;
pub mod header;
pub mod object;
pub mod parse;
pub mod pdf;
pub mod process;
pub mod structure;
pub mod writer;
pub mod xref;

pub use self::context::Context;
pub use self::context::TrailerInfo;
pub use self::object::Object;
pub use self::object::ObjectKind;
pub use self::object::Serialize;
pub use self::pdf::ParseOptions;
pub use self::pdf::PdfParser;
pub use self::tick::Checkpoint;
pub use self::writer::stream::PdfStreamWriter;
pub use self::writer::PdfWriter;
pub use self::writer::WriteOptions;

// Limit the size of the decoded stream to 1 GiB.
const DECODED_LIMIT: usize = 1 << 30;
const MAX_DEBUG_BYTES: usize = 100;

/// Although u32 would suffice for most cases, allowing for ~.5 GiB files,
/// [7.5.4 Cross-reference table, p56] only restricts bytes offsets to 10
/// digits, allowing for ~9.3 GiB files. Hence, it can be represented as a u64
/// if the operating system supports it. However, in any case, we need to
/// convert to `usize` to index the buffer.
pub type Offset = usize;
/// REFERENCE: [3.33 indirect object, p10]
/// Object numbers are positive integers, but zero remains addressable as the
/// head of the free list (`0 65535 R`) and in malformed files that use it.
pub type ObjectNumber = u64;
/// REFERENCE:
/// - [3.33 indirect object, p10]
/// - [7.5.4 Cross-reference table, p56-57]
/// - Generation numbers are non-negative integer objects.
/// - They are restricted to 5 digits.
/// - They are allowed the maximum value of 65,535.
/// Hence, it can be represented as a u16.
pub type GenerationNumber = u16;
/// REFERENCE: [4.7 byte, p7]
pub type Byte = u8;

#[cfg(test)]
mod tests {
    #[macro_export]
    macro_rules! assert_err_eq {
        ($result:expr, $expected_error:expr) => {
            assert_eq!($result, Err($expected_error.into()));
        };
    }
}
