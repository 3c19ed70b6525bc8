use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::numeric::Number;
use crate::context::Context;
use crate::fmt::latin1;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::object::Serialize;
use crate::Byte;

/// REFERENCE: [7.3.6 Array objects, p29]
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Array(Vec<Object>);

/// REFERENCE: [7.9.5 Rectangles, p120]
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", latin1(&self.to_bytes()))
    }
}

impl Serialize for Array {
    fn size_in_bytes(&self) -> usize {
        // `[ ` and `]`, then a space after each element
        3 + self
            .0
            .iter()
            .map(|object| object.size_in_bytes() + 1)
            .sum::<usize>()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let initial_len = buffer.len();
        buffer.extend_from_slice(b"[ ");
        for object in self.0.iter() {
            object.copy_bytes_into(buffer);
            buffer.push(b' ');
        }
        buffer.push(b']');
        buffer.len() - initial_len
    }
}

mod convert {
    use super::*;

    impl Array {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn size(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        pub fn push(&mut self, object: impl Into<Object>) {
            self.0.push(object.into());
        }

        pub fn insert(&mut self, index: usize, object: impl Into<Object>) -> ObjectResult<()> {
            self.check_index(index, self.0.len() + 1)?;
            self.0.insert(index, object.into());
            Ok(())
        }

        pub fn remove(&mut self, index: usize) -> ObjectResult<Object> {
            self.check_index(index, self.0.len())?;
            Ok(self.0.remove(index))
        }

        pub fn set(&mut self, index: usize, object: impl Into<Object>) -> ObjectResult<()> {
            let size = self.0.len();
            let slot = self
                .0
                .get_mut(index)
                .ok_or(ObjectErr::IndexOutOfBounds { index, size })?;
            *slot = object.into();
            Ok(())
        }

        pub fn get(&self, index: usize) -> Option<&Object> {
            self.0.get(index)
        }

        pub fn get_mut(&mut self, index: usize) -> Option<&mut Object> {
            self.0.get_mut(index)
        }

        pub fn index_of(&self, object: &Object) -> Option<usize> {
            self.0.iter().position(|element| element == object)
        }

        pub fn iter(&self) -> impl Iterator<Item = &Object> {
            self.0.iter()
        }

        pub fn as_slice(&self) -> &[Object] {
            &self.0
        }

        fn check_index(&self, index: usize, bound: usize) -> ObjectResult<()> {
            if index >= bound {
                return Err(ObjectErr::IndexOutOfBounds {
                    index,
                    size: self.0.len(),
                });
            }
            Ok(())
        }
    }

    impl From<Vec<Object>> for Array {
        fn from(objects: Vec<Object>) -> Self {
            Self(objects)
        }
    }

    impl FromIterator<Object> for Array {
        fn from_iter<T: IntoIterator<Item = Object>>(iter: T) -> Self {
            Self(iter.into_iter().collect())
        }
    }
}

mod process {
    use super::*;

    impl Array {
        /// Resolve the element at `index` through `context`. When `kinds` is
        /// not empty, the resolved value must match one of them.
        pub fn lookup<'a>(
            &'a self,
            index: usize,
            context: &'a Context,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            context.resolve(self.0.get(index), kinds)
        }

        pub fn lookup_maybe<'a>(
            &'a self,
            index: usize,
            context: &'a Context,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            context.resolve_maybe(self.0.get(index), kinds)
        }

        /// Read `[llx lly urx ury]` as a rectangle.
        pub fn as_rectangle(&self, context: &Context) -> ObjectResult<Rectangle> {
            if self.0.len() != 4 {
                return Err(ObjectErr::NotRectangle(self.0.len()));
            }
            let mut coordinates = [0.0; 4];
            for (index, coordinate) in coordinates.iter_mut().enumerate() {
                *coordinate = self
                    .lookup(index, context, &[ObjectKind::Number])?
                    .and_then(Object::as_number)
                    .unwrap_or_default();
            }
            let [lower_left_x, lower_left_y, upper_right_x, upper_right_y] = coordinates;
            Ok(Rectangle {
                x: lower_left_x,
                y: lower_left_y,
                width: upper_right_x - lower_left_x,
                height: upper_right_y - lower_left_y,
            })
        }

        /// Multiply the numbers at even indices by `x` and those at odd
        /// indices by `y`. Referenced numbers are replaced by direct ones.
        pub fn scale_numbers(&mut self, context: &Context, x: f64, y: f64) {
            for index in 0..self.0.len() {
                let value = match context.resolve(self.0.get(index), &[]) {
                    Ok(Some(Object::Number(number))) => number.value(),
                    _ => continue,
                };
                let factor = if index % 2 == 0 { x } else { y };
                self.0[index] = Number::of(value * factor).into();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::name::Name;

    fn media_box() -> Array {
        [0.0, 0.0, 612.0, 792.0]
            .into_iter()
            .map(Object::from)
            .collect()
    }

    #[test]
    fn array_serialize() {
        let mut array = media_box();
        array.push(Name::of("Fit"));
        let expected = b"[ 0 0 612 792 /Fit ]";
        assert_eq!(array.size_in_bytes(), expected.len());
        assert_eq!(array.to_bytes(), expected);
        assert_eq!(Array::new().to_bytes(), b"[ ]");
    }

    #[test]
    fn array_edit() {
        let mut array = media_box();
        assert_eq!(array.insert(4, Object::Null), Ok(()));
        assert_eq!(array.insert(1, true), Ok(()));
        assert_eq!(array.remove(0), Ok(Object::from(0.0)));
        assert_eq!(array.set(0, false), Ok(()));
        assert_eq!(array.index_of(&Object::Null), Some(4));
        assert_eq!(
            array.set(9, Object::Null),
            Err(ObjectErr::IndexOutOfBounds { index: 9, size: 5 })
        );
        assert_eq!(
            array.insert(7, Object::Null),
            Err(ObjectErr::IndexOutOfBounds { index: 7, size: 5 })
        );
        assert_eq!(
            Array::new().remove(0),
            Err(ObjectErr::IndexOutOfBounds { index: 0, size: 0 })
        );
    }

    #[test]
    fn array_as_rectangle() {
        let mut context = Context::create();
        let mut array = media_box();
        let height = context.register(Number::of(842.0));
        array.set(3, height).unwrap();
        assert_eq!(
            array.as_rectangle(&context),
            Ok(Rectangle {
                x: 0.0,
                y: 0.0,
                width: 612.0,
                height: 842.0
            })
        );
        array.push(1.0);
        assert_eq!(array.as_rectangle(&context), Err(ObjectErr::NotRectangle(5)));
    }

    #[test]
    fn array_scale_numbers() {
        let context = Context::create();
        let mut array = media_box();
        array.push(Name::of("Skip"));
        array.scale_numbers(&context, 0.5, 2.0);
        assert_eq!(array.to_bytes(), b"[ 0 0 306 1584 /Skip ]");
    }
}
