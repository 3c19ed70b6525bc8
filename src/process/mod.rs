pub mod encoding;
pub(crate) mod escape;
pub mod filter;
