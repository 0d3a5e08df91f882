pub mod ayah;
pub mod chapter;
pub mod document;
pub mod translation;

pub use ayah::*;
pub use chapter::*;
pub use document::*;
pub use translation::*;
