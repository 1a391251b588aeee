pub mod document;
pub mod tree;

pub use document::build_document;
pub use tree::{Element, parse_tree};

use define_model::{DocumentModel, Result};

/// Parse raw define.xml bytes and build the document model in one step.
pub fn parse_define(bytes: &[u8]) -> Result<DocumentModel> {
    let tree = parse_tree(bytes)?;
    build_document(&tree)
}
