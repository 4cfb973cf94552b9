mod arena;
mod commands;
mod memory;

pub use arena::{Element, ElementArena, NodeId};
pub use commands::DomCommand;
pub use memory::MemoryDom;

use crate::error::Result;

/// Element-level DOM operations the banner needs.
///
/// Implementations wrap a real document (see the web crate) or an in-memory
/// tree ([`MemoryDom`]). `class` and `style` may be passed as attributes at
/// creation time.
pub trait Dom {
    type Element: Clone + 'static;

    fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<Self::Element>;

    /// Replace the text content of an element
    fn set_text(&self, element: &Self::Element, text: &str) -> Result<()>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<()>;

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<()>;

    /// Set a single inline style property
    fn set_style(&self, element: &Self::Element, property: &str, value: &str) -> Result<()>;

    /// Remove every child of the element (`innerHTML = ""`)
    fn clear_children(&self, element: &Self::Element) -> Result<()>;
}
