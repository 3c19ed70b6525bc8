pub mod invalid;
pub mod reference;
pub mod stream;
