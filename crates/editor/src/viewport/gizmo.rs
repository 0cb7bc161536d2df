use shared::NodeId;

/// Attach state of the external transform gizmo widget. The widget itself
/// (handle drawing, drag math) lives outside the engine and reads this.
#[derive(Default)]
pub struct GizmoState {
    attached: Option<NodeId>,
}

impl GizmoState {
    pub fn attach(&mut self, node: NodeId) {
        self.attached = Some(node);
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn attached(&self) -> Option<&NodeId> {
        self.attached.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}
