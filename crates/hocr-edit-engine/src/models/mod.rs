pub mod page;
pub mod revision;
pub mod word;

pub use page::Page;
pub use revision::Revision;
pub use word::{AttributeQuote, BBox, Word};
