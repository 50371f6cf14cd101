//! Host DOM model the widgets attach to.

mod document;
mod node;
mod page;
mod selector;

pub use document::Document;
pub use node::NodeId;
pub use page::Page;
pub use selector::{AttributeMatch, Selector};
