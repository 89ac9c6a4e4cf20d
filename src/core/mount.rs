use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tiny_skia::Pixmap;

use super::Viewport;

/// One child of a mount point.
#[derive(Clone)]
pub enum MountNode {
    /// A painted bitmap surface, tagged with the chart instance that owns it.
    Surface { owner: u64, pixmap: Pixmap },
    /// Any other element left behind by a chart (tooltips, legends, ...).
    Element { owner: Option<u64>, tag: String },
}

impl MountNode {
    #[must_use]
    pub fn owner(&self) -> Option<u64> {
        match self {
            Self::Surface { owner, .. } => Some(*owner),
            Self::Element { owner, .. } => *owner,
        }
    }
}

impl fmt::Debug for MountNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface { owner, pixmap } => f
                .debug_struct("Surface")
                .field("owner", owner)
                .field("width", &pixmap.width())
                .field("height", &pixmap.height())
                .finish(),
            Self::Element { owner, tag } => f
                .debug_struct("Element")
                .field("owner", owner)
                .field("tag", tag)
                .finish(),
        }
    }
}

#[derive(Debug)]
struct MountState {
    viewport: Viewport,
    nodes: Vec<MountNode>,
}

/// Host-owned surface charts draw into.
///
/// Cloning yields another reference to the same mount point; the playground
/// and every chart attached to it observe the same nodes and measured size.
#[derive(Clone)]
pub struct MountPoint {
    state: Rc<RefCell<MountState>>,
}

impl MountPoint {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Rc::new(RefCell::new(MountState {
                viewport,
                nodes: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    /// Records a new measured size; charts pick it up on their next fit.
    pub fn resize(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Removes every child node.
    pub fn clear(&self) {
        self.state.borrow_mut().nodes.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().nodes.is_empty()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    #[must_use]
    pub fn nodes(&self) -> Vec<MountNode> {
        self.state.borrow().nodes.clone()
    }

    pub fn append(&self, node: MountNode) {
        self.state.borrow_mut().nodes.push(node);
    }

    /// Replaces the surface owned by `owner`, or appends one if it has none yet.
    pub fn attach_surface(&self, owner: u64, pixmap: Pixmap) {
        let mut state = self.state.borrow_mut();
        let existing = state.nodes.iter().position(|node| {
            matches!(node, MountNode::Surface { owner: node_owner, .. } if *node_owner == owner)
        });
        let node = MountNode::Surface { owner, pixmap };
        match existing {
            Some(index) => state.nodes[index] = node,
            None => state.nodes.push(node),
        }
    }

    /// Removes every node owned by `owner`. Returns the number removed.
    pub fn detach_owner(&self, owner: u64) -> usize {
        let mut state = self.state.borrow_mut();
        let before = state.nodes.len();
        state.nodes.retain(|node| node.owner() != Some(owner));
        before - state.nodes.len()
    }

    /// First painted surface in document order.
    #[must_use]
    pub fn find_surface(&self) -> Option<Pixmap> {
        self.state.borrow().nodes.iter().find_map(|node| match node {
            MountNode::Surface { pixmap, .. } => Some(pixmap.clone()),
            MountNode::Element { .. } => None,
        })
    }

    #[must_use]
    pub fn same_mount(&self, other: &MountPoint) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for MountPoint {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl fmt::Debug for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MountPoint")
            .field("viewport", &state.viewport)
            .field("nodes", &state.nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tiny_skia::Pixmap;

    use super::{MountNode, MountPoint};
    use crate::core::Viewport;

    fn pixmap(width: u32, height: u32) -> Pixmap {
        Pixmap::new(width, height).expect("pixmap")
    }

    #[test]
    fn attach_surface_replaces_existing_surface_of_same_owner() {
        let mount = MountPoint::new(Viewport::new(100, 50));
        mount.attach_surface(7, pixmap(10, 10));
        mount.attach_surface(7, pixmap(20, 20));

        assert_eq!(mount.node_count(), 1);
        let surface = mount.find_surface().expect("surface");
        assert_eq!((surface.width(), surface.height()), (20, 20));
    }

    #[test]
    fn detach_owner_leaves_foreign_nodes() {
        let mount = MountPoint::default();
        mount.attach_surface(1, pixmap(4, 4));
        mount.append(MountNode::Element {
            owner: Some(1),
            tag: "tooltip".to_owned(),
        });
        mount.append(MountNode::Element {
            owner: None,
            tag: "host-banner".to_owned(),
        });

        assert_eq!(mount.detach_owner(1), 2);
        assert_eq!(mount.node_count(), 1);
        assert!(mount.find_surface().is_none());

        mount.clear();
        assert!(mount.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let mount = MountPoint::default();
        let alias = mount.clone();
        alias.resize(Viewport::new(1024, 768));

        assert!(mount.same_mount(&alias));
        assert_eq!(mount.viewport(), Viewport::new(1024, 768));
    }
}
