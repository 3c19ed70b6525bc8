#[macro_export]
macro_rules! impl_from {
    ($from:ty, $variant:ident, $to:ty) => {
        impl From<$from> for $to {
            fn from(value: $from) -> Self {
                Self::$variant(value.into())
            }
        }
    };
}

/// Forward `Deref` and `DerefMut` of a dictionary-backed structure to its
/// inner dictionary.
#[macro_export]
macro_rules! impl_deref_dictionary {
    ($structure:ty) => {
        impl ::std::ops::Deref for $structure {
            type Target = $crate::object::direct::dictionary::Dictionary;

            fn deref(&self) -> &Self::Target {
                &self.dict
            }
        }

        impl ::std::ops::DerefMut for $structure {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.dict
            }
        }
    };
}
