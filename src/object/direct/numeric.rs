use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::Serialize;
use crate::parse::num::number_to_string;
use crate::Byte;

/// REFERENCE: [7.3.3 Numeric objects, p24]
/// Integers and reals share one representation. The text written into a file
/// is computed once, when the number is created.
#[derive(Debug, PartialEq, Clone)]
pub struct Number {
    value: f64,
    text: String,
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.text)
    }
}

impl Serialize for Number {
    fn size_in_bytes(&self) -> usize {
        self.text.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        buffer.extend_from_slice(self.text.as_bytes());
        self.text.len()
    }
}

mod convert {
    use super::*;

    impl Number {
        pub fn of(value: f64) -> Self {
            Self {
                value,
                text: number_to_string(value),
            }
        }

        pub fn value(&self) -> f64 {
            self.value
        }

        pub fn as_str(&self) -> &str {
            &self.text
        }
    }

    impl From<f64> for Number {
        fn from(value: f64) -> Self {
            Self::of(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_serialize() {
        let number = Number::of(21.0);
        assert_eq!(number.to_string(), "21");
        assert_eq!(number.size_in_bytes(), 2);
        assert_eq!(number.to_bytes(), b"21");

        let number = Number::of(-0.25);
        assert_eq!(number.to_bytes(), b"-0.25");
        assert_eq!(number.value(), -0.25);
    }
}
