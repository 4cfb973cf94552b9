use super::arena::NodeId;

/// Mutation recorded by [`super::MemoryDom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomCommand {
    Create {
        node: NodeId,
        tag: String,
    },
    SetText {
        node: NodeId,
        value: String,
    },
    AppendChild {
        parent: NodeId,
        child: NodeId,
    },
    AddClass {
        node: NodeId,
        class: String,
    },
    SetStyle {
        node: NodeId,
        property: String,
        value: String,
    },
    ClearChildren {
        node: NodeId,
    },
}

impl DomCommand {
    /// Element whose state this command changes
    pub fn target(&self) -> NodeId {
        match self {
            DomCommand::Create { node, .. } => *node,
            DomCommand::SetText { node, .. } => *node,
            DomCommand::AppendChild { parent, .. } => *parent,
            DomCommand::AddClass { node, .. } => *node,
            DomCommand::SetStyle { node, .. } => *node,
            DomCommand::ClearChildren { node } => *node,
        }
    }
}
