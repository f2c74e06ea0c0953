use super::{Packer, footprint, place_at};
use crate::config::PackerConfig;
use crate::model::{Item, Placement, Rect};

type NodeId = usize;

#[derive(Clone, Copy, Debug)]
struct TreeNode {
    rect: Rect,
    used: bool,
    right: Option<NodeId>,
    down: Option<NodeId>,
}

impl TreeNode {
    fn leaf(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Binary-tree guillotine packer.
///
/// Nodes live in an arena rooted at index 0 (the whole canvas). Placing an
/// item into a leaf marks it used and cuts the rest into a `right` child
/// (beside the item, item height) and a `down` child (below it, full width).
/// Splits are never merged or undone.
pub struct GuillotinePacker {
    spacing: u32,
    nodes: Vec<TreeNode>,
    stack: Vec<NodeId>,
}

impl GuillotinePacker {
    pub fn new(config: &PackerConfig) -> Self {
        Self {
            spacing: config.spacing,
            nodes: vec![TreeNode::leaf(Rect::new(
                0,
                0,
                config.canvas_width,
                config.canvas_height,
            ))],
            stack: Vec::new(),
        }
    }

    /// Unused leaves that still have area, in arena order.
    pub fn free_leaves(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes
            .iter()
            .filter(|n| !n.used && !n.rect.is_empty())
            .map(|n| n.rect)
    }

    /// Depth-first search for the first unused leaf holding `fw x fh`.
    /// A used node yields its right subtree before its down subtree.
    fn find(&self, fw: u32, fh: u32) -> Option<NodeId> {
        self.find_with(&mut Vec::new(), fw, fh)
    }

    fn find_with(&self, stack: &mut Vec<NodeId>, fw: u32, fh: u32) -> Option<NodeId> {
        stack.clear();
        stack.push(0);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.used {
                if let Some(down) = node.down {
                    stack.push(down);
                }
                if let Some(right) = node.right {
                    stack.push(right);
                }
            } else if node.rect.fits(fw, fh) {
                return Some(id);
            }
        }
        None
    }

    fn split(&mut self, id: NodeId, fw: u32, fh: u32) {
        let r = self.nodes[id].rect;
        let down = Rect::new(r.x, r.y + fh, r.w, r.h - fh);
        let right = Rect::new(r.x + fw, r.y, r.w - fw, fh);
        let down = (!down.is_empty()).then(|| self.alloc(down));
        let right = (!right.is_empty()).then(|| self.alloc(right));
        let node = &mut self.nodes[id];
        node.used = true;
        node.down = down;
        node.right = right;
    }

    fn alloc(&mut self, rect: Rect) -> NodeId {
        self.nodes.push(TreeNode::leaf(rect));
        self.nodes.len() - 1
    }
}

impl<K: Clone> Packer<K> for GuillotinePacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        footprint(w, h, self.spacing).is_some_and(|(fw, fh)| self.find(fw, fh).is_some())
    }

    fn pack(&mut self, item: &Item<K>) -> Option<Placement<K>> {
        let (fw, fh) = footprint(item.w, item.h, self.spacing)?;
        let mut stack = std::mem::take(&mut self.stack);
        let found = self.find_with(&mut stack, fw, fh);
        self.stack = stack;
        let id = found?;
        let origin = self.nodes[id].rect;
        self.split(id, fw, fh);
        Some(place_at(item, origin.x, origin.y, self.spacing))
    }
}
