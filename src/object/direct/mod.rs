pub mod array;
pub mod dictionary;
pub mod name;
pub mod numeric;
pub mod string;
