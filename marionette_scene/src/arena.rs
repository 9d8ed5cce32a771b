// The node arena — explicit ownership tree with parent indices.
//
// Nodes live in a slab indexed by `NodeId`; freed slots are recycled through
// a free list, so `NodeId`s are only valid until their node is removed.
// Each node carries a local TRS (translation, Euler rotation, scale), a
// visibility flag, and its parent/children links.
//
// World-space queries compose transforms root-to-leaf on demand. Effective
// visibility is the AND of the chain: hiding a parent hides the subtree
// without touching child flags, which is how instruments hide themselves
// while their strikers keep animating underneath.
//
// Removal is recursive — removing a node frees its whole subtree. Transient
// elements (steam particles) rely on this for cheap despawn.

use crate::math::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Compact handle to a node in a `SceneArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// One scene node: local TRS, visibility, and tree links.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    translation: Vec3,
    /// Euler rotation in radians, applied X then Y then Z.
    rotation: Vec3,
    scale: Vec3,
    visible: bool,
}

impl Node {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
        }
    }
}

/// Arena of scene nodes. The animation core's only mutation surface.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneArena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node, optionally attached under a parent. Panics if the
    /// parent id is stale — attaching under a freed node is a logic bug,
    /// not a runtime condition.
    pub fn create_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(Node::new(parent));
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(Node::new(parent)));
                NodeId(self.slots.len() as u32 - 1)
            }
        };
        if let Some(p) = parent {
            self.node_mut(p).children.push(id);
        }
        id
    }

    /// Remove a node and its entire subtree, recycling their slots.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.slots[id.0 as usize].take() {
            if let Some(p) = node.parent
                && let Some(parent) = self.slots[p.0 as usize].as_mut()
            {
                parent.children.retain(|c| *c != id);
            }
            self.free.push(id.0);
            for child in node.children {
                self.remove_child_recursive(child);
            }
        }
    }

    fn remove_child_recursive(&mut self, id: NodeId) {
        if let Some(node) = self.slots[id.0 as usize].take() {
            self.free.push(id.0);
            for child in node.children {
                self.remove_child_recursive(child);
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0 as usize)
            .is_some_and(|slot| slot.is_some())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- transform interface -------------------------------------------------

    pub fn set_local_translation(&mut self, id: NodeId, translation: Vec3) {
        self.node_mut(id).translation = translation;
    }

    /// Set local rotation from Euler angles in radians (X then Y then Z).
    pub fn set_rotation_euler(&mut self, id: NodeId, rotation: Vec3) {
        self.node_mut(id).rotation = rotation;
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec3) {
        self.node_mut(id).scale = scale;
    }

    pub fn set_scale_uniform(&mut self, id: NodeId, scale: f32) {
        self.node_mut(id).scale = Vec3::new(scale, scale, scale);
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.node_mut(id).visible = visible;
    }

    pub fn local_translation(&self, id: NodeId) -> Vec3 {
        self.node(id).translation
    }

    pub fn rotation_euler(&self, id: NodeId) -> Vec3 {
        self.node(id).rotation
    }

    pub fn scale(&self, id: NodeId) -> Vec3 {
        self.node(id).scale
    }

    pub fn visible(&self, id: NodeId) -> bool {
        self.node(id).visible
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    // -- world-space queries -------------------------------------------------

    /// World-space position of a node's origin, composed root-to-leaf.
    pub fn world_translation(&self, id: NodeId) -> Vec3 {
        let node = self.node(id);
        match node.parent {
            None => node.translation,
            Some(p) => {
                let parent_rot = self.world_rotation(p);
                let parent_pos = self.world_translation(p);
                parent_pos.add(parent_rot.mul_vec(node.translation))
            }
        }
    }

    /// Composed world rotation matrix.
    pub fn world_rotation(&self, id: NodeId) -> Mat3 {
        let node = self.node(id);
        let local = Mat3::from_euler(node.rotation);
        match node.parent {
            None => local,
            Some(p) => self.world_rotation(p).mul_mat(local),
        }
    }

    /// Effective visibility: false if this node or any ancestor is hidden.
    pub fn world_visible(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.visible && node.parent.is_none_or(|p| self.world_visible(p))
    }

    fn node(&self, id: NodeId) -> &Node {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("stale NodeId: node was removed")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("stale NodeId: node was removed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_query() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        let child = arena.create_node(Some(root));

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.parent(child), Some(root));
        assert_eq!(arena.children(root), &[child]);
        assert!(arena.visible(child));
        assert_eq!(arena.scale(child), Vec3::ONE);
    }

    #[test]
    fn world_translation_composes_parents() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        let child = arena.create_node(Some(root));
        arena.set_local_translation(root, Vec3::new(10.0, 0.0, 0.0));
        arena.set_local_translation(child, Vec3::new(0.0, 5.0, 0.0));

        let world = arena.world_translation(child);
        assert_eq!(world, Vec3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn world_translation_respects_parent_rotation() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        let child = arena.create_node(Some(root));
        // Quarter turn about Z: child's +X offset lands on +Y.
        arena.set_rotation_euler(root, Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        arena.set_local_translation(child, Vec3::new(1.0, 0.0, 0.0));

        let world = arena.world_translation(child);
        assert!(world.x.abs() < 1e-6);
        assert!((world.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hiding_a_parent_hides_the_subtree() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        let child = arena.create_node(Some(root));

        assert!(arena.world_visible(child));
        arena.set_visible(root, false);
        assert!(!arena.world_visible(child));
        // The child's own flag is untouched.
        assert!(arena.visible(child));
    }

    #[test]
    fn remove_subtree_frees_descendants_and_recycles_slots() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        let child = arena.create_node(Some(root));
        let grandchild = arena.create_node(Some(child));

        arena.remove_subtree(child);
        assert!(!arena.contains(child));
        assert!(!arena.contains(grandchild));
        assert!(arena.contains(root));
        assert!(arena.children(root).is_empty());
        assert_eq!(arena.len(), 1);

        // Slots are recycled.
        let reused = arena.create_node(Some(root));
        assert!(reused == child || reused == grandchild);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut arena = SceneArena::new();
        let root = arena.create_node(None);
        arena.set_local_translation(root, Vec3::new(1.0, 2.0, 3.0));

        let json = serde_json::to_string(&arena).unwrap();
        let restored: SceneArena = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.local_translation(root), Vec3::new(1.0, 2.0, 3.0));
    }
}
