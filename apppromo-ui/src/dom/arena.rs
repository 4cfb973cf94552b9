use smartstring::{LazyCompact, SmartString};

type Name = SmartString<LazyCompact>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: Name,
    pub attrs: Vec<(Name, String)>,
    pub classes: Vec<Name>,
    pub styles: Vec<(Name, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n.as_str() == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.into(), value.to_string())),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.as_str() == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.into());
        }
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| p.as_str() == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, property: &str, value: &str) {
        match self.styles.iter_mut().find(|(p, _)| p.as_str() == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.styles.push((property.into(), value.to_string())),
        }
    }
}

/// Slot arena of elements with parent links and slot reuse.
pub struct ElementArena {
    nodes: Vec<Option<Element>>,
    parents: Vec<Option<NodeId>>,
    free_list: Vec<u32>,
}

impl ElementArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub fn create(&mut self, element: Element) -> NodeId {
        let index = if let Some(idx) = self.free_list.pop() {
            idx as usize
        } else {
            self.nodes.len()
        };

        if index >= self.nodes.len() {
            self.nodes.push(Some(element));
            self.parents.push(None);
        } else {
            self.nodes[index] = Some(element);
            self.parents[index] = None;
        }

        NodeId(index as u32)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        if let Some(p) = self.parents.get_mut(node.0 as usize) {
            *p = parent;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        *self.parents.get(node.0 as usize)?
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|e| e.children.clone()).unwrap_or_default()
    }

    /// Free a node and its whole subtree
    pub fn dispose(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.dispose(child);
        }

        let idx = id.0 as usize;
        if idx < self.nodes.len() && self.nodes[idx].is_some() {
            self.nodes[idx] = None;
            self.parents[idx] = None;
            self.free_list.push(id.0);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ElementArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_frees_subtree_and_reuses_slots() {
        let mut arena = ElementArena::new();
        let root = arena.create(Element::new("div"));
        let child = arena.create(Element::new("ul"));
        let grandchild = arena.create(Element::new("li"));

        arena.get_mut(root).unwrap().children.push(child);
        arena.set_parent(child, Some(root));
        arena.get_mut(child).unwrap().children.push(grandchild);
        arena.set_parent(grandchild, Some(child));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.parent(grandchild), Some(child));

        arena.dispose(child);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(grandchild).is_none());

        // Freed slots are handed out again
        let reused = arena.create(Element::new("span"));
        assert!(reused == child || reused == grandchild);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_element_attributes_and_styles() {
        let mut el = Element::new("span");
        el.set_attr("id", "a");
        el.set_attr("id", "b");
        el.add_class("progress");
        el.add_class("progress");
        el.set_style("width", "75%");

        assert_eq!(el.attr("id"), Some("b"));
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.classes.len(), 1);
        assert_eq!(el.style("width"), Some("75%"));
        assert_eq!(el.style("height"), None);
    }
}
