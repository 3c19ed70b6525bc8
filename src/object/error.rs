use ::std::fmt::Write as _;
use ::thiserror::Error;

use super::ObjectKind;

pub type ObjectResult<T> = Result<T, ObjectErr>;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ObjectErr {
    #[error(
        "Unexpected object type. Expected: {}. Found: {}",
        display_kinds(.expected),
        display_actual(.actual)
    )]
    UnexpectedType {
        expected: Vec<ObjectKind>,
        actual: Option<ObjectKind>,
    },
    #[error("Array is not a rectangle. Size: {0}")]
    NotRectangle(usize),
    #[error("Index out of bounds. Index: {index}. Size: {size}")]
    IndexOutOfBounds { index: usize, size: usize },
    #[error("Invalid date string: {0:?}")]
    InvalidDate(String),
    #[error("Invalid target index: {target_index}. Page count: {count}")]
    InvalidTargetIndex { target_index: usize, count: usize },
    #[error("Corrupt page tree. Target index: {target_index}. Leaves counted: {count}")]
    CorruptPageTree { target_index: usize, count: usize },
}

fn display_kinds(kinds: &[ObjectKind]) -> String {
    let mut result = String::new();
    for (idx, kind) in kinds.iter().enumerate() {
        if idx > 0 {
            result.push_str(" or ");
        }
        let _ = write!(result, "{kind:?}");
    }
    result
}

fn display_actual(actual: &Option<ObjectKind>) -> String {
    match actual {
        Some(kind) => format!("{kind:?}"),
        None => "nothing".to_string(),
    }
}
