pub mod section;
pub mod stream;
pub mod trailer;

pub use self::section::CrossRefSection;
pub use self::stream::CrossRefEntry;
pub use self::stream::CrossRefStream;
pub use self::trailer::Trailer;
pub use self::trailer::TrailerDict;

// Trailer dictionary keys
pub(crate) const KEY_SIZE: &str = "Size";
pub(crate) const KEY_ROOT: &str = "Root";
pub(crate) const KEY_ENCRYPT: &str = "Encrypt";
pub(crate) const KEY_INFO: &str = "Info";
pub(crate) const KEY_ID: &str = "ID";
// Stream dictionary keys
pub(crate) const KEY_INDEX: &str = "Index";
pub(crate) const KEY_W: &str = "W";
pub(crate) const VAL_XREF: &str = "XRef";
