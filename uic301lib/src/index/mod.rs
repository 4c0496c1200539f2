//! Индекс байтовых смещений по сериализованному дереву.

pub mod builder;
pub mod codec;
pub mod scanner;
pub mod store;
pub mod tree;

pub use builder::IndexBuilder;
pub use scanner::{TagListener, TagScanner};
pub use store::IndexStore;
pub use tree::{IndexTree, Tag, TagKind};
