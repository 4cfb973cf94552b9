use super::Dom;
use super::arena::{Element, ElementArena, NodeId};
use super::commands::DomCommand;
use crate::error::{BannerError, Result};
use std::cell::RefCell;

const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// In-memory document used by tests and the CLI preview.
///
/// Every mutation made through the [`Dom`] trait is recorded as a
/// [`DomCommand`]; the tree can be queried and serialized to HTML.
pub struct MemoryDom {
    arena: RefCell<ElementArena>,
    commands: RefCell<Vec<DomCommand>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            arena: RefCell::new(ElementArena::new()),
            commands: RefCell::new(Vec::new()),
        }
    }

    /// Create a detached element without recording a command.
    ///
    /// Used for host-owned containers that exist before the banner does.
    pub fn container(&self, tag: &str) -> NodeId {
        self.arena.borrow_mut().create(Element::new(tag))
    }

    pub fn commands(&self) -> Vec<DomCommand> {
        self.commands.borrow().clone()
    }

    pub fn take_commands(&self) -> Vec<DomCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    /// Commands that changed `node` itself
    pub fn commands_touching(&self, node: NodeId) -> Vec<DomCommand> {
        self.commands
            .borrow()
            .iter()
            .filter(|cmd| cmd.target() == node)
            .cloned()
            .collect()
    }

    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.arena.borrow().get(id).cloned()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena.borrow().children(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.borrow().parent(id)
    }

    pub fn tag(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|e| e.tag.to_string())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.arena
            .borrow()
            .get(id)
            .and_then(|e| e.attr(name).map(str::to_string))
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.arena
            .borrow()
            .get(id)
            .and_then(|e| e.style(property).map(str::to_string))
    }

    pub fn text(&self, id: NodeId) -> Option<String> {
        self.arena.borrow().get(id).and_then(|e| e.text.clone())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.arena
            .borrow()
            .get(id)
            .is_some_and(|e| e.has_class(class))
    }

    /// Number of live elements in the document
    pub fn len(&self) -> usize {
        self.arena.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth-first search below `root` (inclusive) for an element with this `id` attribute
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.find(root, &|e| e.attr("id") == Some(id))
    }

    pub fn find_by_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.find(root, &|e| e.has_class(class))
    }

    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find(root, &|e| e.tag.as_str() == tag)
    }

    fn find(&self, root: NodeId, pred: &dyn Fn(&Element) -> bool) -> Option<NodeId> {
        let arena = self.arena.borrow();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(element) = arena.get(id) else {
                continue;
            };
            if pred(element) {
                return Some(id);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        None
    }

    /// Concatenated text of `root` and all its descendants
    pub fn text_content(&self, root: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        collect_text(&arena, root, &mut out);
        out
    }

    /// Serialize the children of `root` (the element's inner HTML)
    pub fn inner_html(&self, root: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        for child in arena.children(root) {
            write_html(&arena, child, &mut out);
        }
        out
    }

    /// Serialize `root` including its own tag
    pub fn to_html(&self, root: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        write_html(&arena, root, &mut out);
        out
    }

    fn with_element<T>(&self, id: NodeId, f: impl FnOnce(&mut Element) -> T) -> Result<T> {
        let mut arena = self.arena.borrow_mut();
        let element = arena
            .get_mut(id)
            .ok_or_else(|| BannerError::Dom(format!("unknown element {:?}", id)))?;
        Ok(f(element))
    }

    fn record(&self, cmd: DomCommand) {
        self.commands.borrow_mut().push(cmd);
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let mut element = Element::new(tag);
        for (name, value) in attrs {
            match *name {
                "class" => value.split_whitespace().for_each(|c| element.add_class(c)),
                "style" => {
                    for decl in value.split(';') {
                        if let Some((prop, val)) = decl.split_once(':') {
                            element.set_style(prop.trim(), val.trim());
                        }
                    }
                }
                _ => element.set_attr(name, value),
            }
        }

        let node = self.arena.borrow_mut().create(element);
        self.record(DomCommand::Create {
            node,
            tag: tag.to_string(),
        });
        Ok(node)
    }

    fn set_text(&self, element: &NodeId, text: &str) -> Result<()> {
        let old_children = self.with_element(*element, |e| {
            e.text = Some(text.to_string());
            std::mem::take(&mut e.children)
        })?;
        let mut arena = self.arena.borrow_mut();
        for child in old_children {
            arena.dispose(child);
        }
        drop(arena);

        self.record(DomCommand::SetText {
            node: *element,
            value: text.to_string(),
        });
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let previous = {
            let arena = self.arena.borrow();
            if arena.get(*child).is_none() {
                return Err(BannerError::Dom(format!("unknown element {:?}", child)));
            }
            arena.parent(*child)
        };
        if let Some(previous) = previous {
            self.with_element(previous, |e| e.children.retain(|c| c != child))?;
        }

        self.with_element(*parent, |e| e.children.push(*child))?;
        self.arena.borrow_mut().set_parent(*child, Some(*parent));
        self.record(DomCommand::AppendChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<()> {
        self.with_element(*element, |e| e.add_class(class))?;
        self.record(DomCommand::AddClass {
            node: *element,
            class: class.to_string(),
        });
        Ok(())
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<()> {
        self.with_element(*element, |e| e.set_style(property, value))?;
        self.record(DomCommand::SetStyle {
            node: *element,
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn clear_children(&self, element: &NodeId) -> Result<()> {
        let children = self.with_element(*element, |e| {
            e.text = None;
            std::mem::take(&mut e.children)
        })?;
        let mut arena = self.arena.borrow_mut();
        for child in children {
            arena.dispose(child);
        }
        drop(arena);

        self.record(DomCommand::ClearChildren { node: *element });
        Ok(())
    }
}

fn collect_text(arena: &ElementArena, id: NodeId, out: &mut String) {
    let Some(element) = arena.get(id) else {
        return;
    };
    if let Some(text) = &element.text {
        out.push_str(text);
    }
    for &child in &element.children {
        collect_text(arena, child, out);
    }
}

fn write_html(arena: &ElementArena, id: NodeId, out: &mut String) {
    let Some(element) = arena.get(id) else {
        return;
    };

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
    }
    if !element.classes.is_empty() {
        let classes: Vec<&str> = element.classes.iter().map(|c| c.as_str()).collect();
        out.push_str(&format!(" class=\"{}\"", escape(&classes.join(" "))));
    }
    if !element.styles.is_empty() {
        let styles: Vec<String> = element
            .styles
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect();
        out.push_str(&format!(" style=\"{}\"", escape(&styles.join(" "))));
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    if let Some(text) = &element.text {
        out.push_str(&escape(text));
    }
    for &child in &element.children {
        write_html(arena, child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
