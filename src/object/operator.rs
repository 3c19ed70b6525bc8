use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::Object;
use super::Serialize;
use crate::fmt::latin1;
use crate::Byte;

pub const PUSH_GRAPHICS_STATE: &str = "q";
pub const POP_GRAPHICS_STATE: &str = "Q";

/// An operand written as an unparsed token, or as an object.
#[derive(Debug, PartialEq, Clone)]
pub enum OperatorArg {
    Object(Object),
    Raw(String),
}

/// REFERENCE: [7.8.2 Content streams, p97]
/// A content stream instruction: the operands followed by the operator.
#[derive(Debug, PartialEq, Clone)]
pub struct Operator {
    name: String,
    args: Vec<OperatorArg>,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", latin1(&self.to_bytes()))
    }
}

impl Serialize for OperatorArg {
    fn size_in_bytes(&self) -> usize {
        match self {
            Self::Object(object) => object.size_in_bytes(),
            Self::Raw(token) => token.len(),
        }
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        match self {
            Self::Object(object) => object.copy_bytes_into(buffer),
            Self::Raw(token) => {
                buffer.extend_from_slice(token.as_bytes());
                token.len()
            }
        }
    }
}

impl Serialize for Operator {
    fn size_in_bytes(&self) -> usize {
        self.args
            .iter()
            .map(|arg| arg.size_in_bytes() + 1)
            .sum::<usize>()
            + self.name.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let initial_len = buffer.len();
        for arg in self.args.iter() {
            arg.copy_bytes_into(buffer);
            buffer.push(b' ');
        }
        buffer.extend_from_slice(self.name.as_bytes());
        buffer.len() - initial_len
    }
}

mod convert {
    use super::*;
    use crate::impl_from;
    use crate::object::direct::array::Array;
    use crate::object::direct::dictionary::Dictionary;
    use crate::object::direct::name::Name;
    use crate::object::direct::numeric::Number;
    use crate::object::direct::string::hexadecimal::Hexadecimal;
    use crate::object::direct::string::literal::Literal;

    impl Operator {
        pub fn of(name: impl Into<String>, args: Vec<OperatorArg>) -> Self {
            Self {
                name: name.into(),
                args,
            }
        }

        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn args(&self) -> &[OperatorArg] {
            &self.args
        }
    }

    impl_from!(Object, Object, OperatorArg);
    impl_from!(Name, Object, OperatorArg);
    impl_from!(Number, Object, OperatorArg);
    impl_from!(Array, Object, OperatorArg);
    impl_from!(Dictionary, Object, OperatorArg);
    impl_from!(Literal, Object, OperatorArg);
    impl_from!(Hexadecimal, Object, OperatorArg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::name::Name;

    #[test]
    fn operator_serialize() {
        let operator = Operator::of(
            "Tf",
            vec![Name::of("F1").into(), OperatorArg::Raw("24".to_string())],
        );
        assert_eq!(operator.size_in_bytes(), 9);
        assert_eq!(operator.to_string(), "/F1 24 Tf");
        let push = Operator::of(PUSH_GRAPHICS_STATE, Vec::new());
        assert_eq!(push.to_bytes(), b"q");
    }
}
