use ::nom::branch::alt;
use ::nom::character::complete::char;
use ::nom::character::complete::digit1;
use ::nom::combinator::map_opt;
use ::nom::combinator::opt;
use ::nom::sequence::preceded;
use ::nom::sequence::separated_pair;
use ::nom::IResult;
use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::indirect::reference::Reference;
use crate::object::Serialize;
use crate::parse::character_set::white_space_or_comment;
use crate::parse::num::ascii_to_u64;
use crate::parse::KW_XREF;
use crate::Byte;
use crate::GenerationNumber;
use crate::ObjectNumber;
use crate::Offset;

/// REFERENCE: [7.5.4 Cross-reference table, p56-57]
const BIG_LEN: usize = 10;
const SMALL_LEN: usize = 5;
/// Every entry line, including its two-byte end-of-line marker, is exactly
/// 20 bytes long.
pub(crate) const ENTRY_LEN: usize = 20;

/// One line of a cross-reference subsection. For free entries, `offset`
/// holds the number of the next free object.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SectionEntry {
    pub reference: Reference,
    pub offset: Offset,
    pub deleted: bool,
}

impl Display for SectionEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // The trailing space pads the line to 20 bytes together with `\n`
        write!(
            f,
            "{:0BIG_LEN$} {:0SMALL_LEN$} {} \n",
            self.offset,
            self.reference.generation_number(),
            if self.deleted { 'f' } else { 'n' }
        )
    }
}

/// A line of a cross-reference section as read from a file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum SectionLine {
    /// `first count`
    Subsection(ObjectNumber),
    /// `offset generation n`, or `next_free generation f` when deleted
    Entry {
        offset: u64,
        generation_number: GenerationNumber,
        deleted: bool,
    },
}

/// REFERENCE: [7.5.4 Cross-reference table, p56-57]
/// Either kind of line. The fields may be separated by any white space or
/// comments and need not have their fixed widths. Generation numbers too
/// large for the type are clamped.
pub(crate) fn section_line(buffer: &[Byte]) -> IResult<&[Byte], SectionLine> {
    let (buffer, (first, second)) = separated_pair(
        map_opt(digit1, ascii_to_u64),
        white_space_or_comment,
        map_opt(digit1, ascii_to_u64),
    )(buffer)?;
    let (buffer, kind) = opt(preceded(
        opt(white_space_or_comment),
        alt((char('n'), char('f'))),
    ))(buffer)?;
    let line = match kind {
        Some(kind) => SectionLine::Entry {
            offset: first,
            generation_number: GenerationNumber::try_from(second)
                .unwrap_or(GenerationNumber::MAX),
            deleted: kind == 'f',
        },
        None => SectionLine::Subsection(first),
    };
    Ok((buffer, line))
}

/// REFERENCE: [7.5.4 Cross-reference table, p55-57]
/// Entries grouped into subsections of consecutive object numbers. Entries
/// must be added in ascending object-number order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CrossRefSection {
    subsections: Vec<Vec<SectionEntry>>,
}

impl Display for CrossRefSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{}", KW_XREF)?;
        for subsection in self.subsections.iter() {
            let Some(first) = subsection.first() else {
                continue;
            };
            writeln!(
                f,
                "{} {}",
                first.reference.object_number(),
                subsection.len()
            )?;
            for entry in subsection.iter() {
                write!(f, "{}", entry)?;
            }
        }
        Ok(())
    }
}

impl Serialize for CrossRefSection {
    fn size_in_bytes(&self) -> usize {
        let subsections: usize = self
            .subsections
            .iter()
            .filter_map(|subsection| {
                let first = subsection.first()?;
                let header = first.reference.object_number().to_string().len()
                    + subsection.len().to_string().len()
                    + 2;
                Some(header + ENTRY_LEN * subsection.len())
            })
            .sum();
        KW_XREF.len() + 1 + subsections
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let text = self.to_string();
        buffer.extend_from_slice(text.as_bytes());
        text.len()
    }
}

mod convert {
    use super::*;

    impl CrossRefSection {
        /// A section starting with the head of the free list, `0 65535 f`.
        pub fn create() -> Self {
            let mut section = Self::create_empty();
            section.add_deleted_entry(Reference::of(0, GenerationNumber::MAX), 0);
            section
        }

        pub fn create_empty() -> Self {
            Self::default()
        }

        pub fn subsections(&self) -> &[Vec<SectionEntry>] {
            &self.subsections
        }

        pub fn entries(&self) -> impl Iterator<Item = &SectionEntry> {
            self.subsections.iter().flatten()
        }
    }
}

mod process {
    use super::*;

    impl CrossRefSection {
        pub fn add_entry(&mut self, reference: Reference, offset: Offset) {
            self.append(SectionEntry {
                reference,
                offset,
                deleted: false,
            });
        }

        pub fn add_deleted_entry(&mut self, reference: Reference, next_free: ObjectNumber) {
            self.append(SectionEntry {
                reference,
                offset: next_free as Offset,
                deleted: true,
            });
        }

        /// A gap in the object numbers opens a new subsection.
        fn append(&mut self, entry: SectionEntry) {
            let object_number = entry.reference.object_number();
            let contiguous = self
                .subsections
                .last()
                .and_then(|subsection| subsection.last())
                .map_or(false, |last| {
                    object_number.checked_sub(last.reference.object_number()) == Some(1)
                });
            match self.subsections.last_mut() {
                Some(subsection) if contiguous => subsection.push(entry),
                _ => self.subsections.push(vec![entry]),
            }
        }
    }
}
