//! Box arrangement for raster sprites.
//!
//! Every item is laid out as its own size plus `padding` on the right and
//! bottom; the padding trailing the last row/column is trimmed from the
//! final canvas size.

use super::Layout;

/// Positions (same order as the input sizes) and canvas size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub positions: Vec<(u32, u32)>,
    pub width: u32,
    pub height: u32,
}

/// Arrange `(width, height)` boxes according to `layout`.
pub fn arrange(sizes: &[(u32, u32)], padding: u32, layout: Layout) -> Arrangement {
    let boxes: Vec<(u32, u32)> = sizes
        .iter()
        .map(|&(w, h)| (w + padding, h + padding))
        .collect();

    let (positions, total_w, total_h) = match layout {
        Layout::TopDown => top_down(&boxes),
        Layout::LeftRight => left_right(&boxes),
        Layout::Diagonal => diagonal(&boxes),
        Layout::AltDiagonal => alt_diagonal(&boxes),
        Layout::BinaryTree => binary_tree(&boxes),
    };

    Arrangement {
        positions,
        width: total_w.saturating_sub(padding),
        height: total_h.saturating_sub(padding),
    }
}

type Placed = (Vec<(u32, u32)>, u32, u32);

fn top_down(boxes: &[(u32, u32)]) -> Placed {
    let mut y = 0;
    let mut positions = Vec::with_capacity(boxes.len());
    for &(_, h) in boxes {
        positions.push((0, y));
        y += h;
    }
    let width = boxes.iter().map(|b| b.0).max().unwrap_or(0);
    (positions, width, y)
}

fn left_right(boxes: &[(u32, u32)]) -> Placed {
    let mut x = 0;
    let mut positions = Vec::with_capacity(boxes.len());
    for &(w, _) in boxes {
        positions.push((x, 0));
        x += w;
    }
    let height = boxes.iter().map(|b| b.1).max().unwrap_or(0);
    (positions, x, height)
}

fn diagonal(boxes: &[(u32, u32)]) -> Placed {
    let (mut x, mut y) = (0, 0);
    let mut positions = Vec::with_capacity(boxes.len());
    for &(w, h) in boxes {
        positions.push((x, y));
        x += w;
        y += h;
    }
    (positions, x, y)
}

/// Diagonal from bottom-left to top-right.
fn alt_diagonal(boxes: &[(u32, u32)]) -> Placed {
    let total_h: u32 = boxes.iter().map(|b| b.1).sum();
    let (mut x, mut y) = (0, total_h);
    let mut positions = Vec::with_capacity(boxes.len());
    for &(w, h) in boxes {
        y -= h;
        positions.push((x, y));
        x += w;
    }
    (positions, x, total_h)
}

// --- growing binary-tree packer ---

#[derive(Debug, Clone)]
struct TreeNode {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl TreeNode {
    fn free(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            used: false,
            right: None,
            down: None,
        }
    }
}

struct GrowingPacker {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl GrowingPacker {
    fn new(w: u32, h: u32) -> Self {
        Self {
            nodes: vec![TreeNode::free(0, 0, w, h)],
            root: 0,
        }
    }

    fn place(&mut self, w: u32, h: u32) -> (u32, u32) {
        if let Some(node) = self.find(self.root, w, h) {
            return self.split(node, w, h);
        }
        self.grow(w, h)
    }

    fn find(&self, idx: usize, w: u32, h: u32) -> Option<usize> {
        let node = &self.nodes[idx];
        if node.used {
            node.right
                .and_then(|r| self.find(r, w, h))
                .or_else(|| node.down.and_then(|d| self.find(d, w, h)))
        } else if w <= node.w && h <= node.h {
            Some(idx)
        } else {
            None
        }
    }

    fn split(&mut self, idx: usize, w: u32, h: u32) -> (u32, u32) {
        let TreeNode { x, y, w: nw, h: nh, .. } = self.nodes[idx];
        let down = self.push(TreeNode::free(x, y + h, nw, nh - h));
        let right = self.push(TreeNode::free(x + w, y, nw - w, h));
        let node = &mut self.nodes[idx];
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        (x, y)
    }

    fn grow(&mut self, w: u32, h: u32) -> (u32, u32) {
        let root = &self.nodes[self.root];
        let can_down = w <= root.w;
        let can_right = h <= root.h;
        let should_right = can_right && root.h >= root.w + w;
        let should_down = can_down && root.w >= root.h + h;

        if should_right || (!should_down && can_right) || !can_down {
            self.grow_right(w, h)
        } else {
            self.grow_down(w, h)
        }
    }

    fn grow_right(&mut self, w: u32, h: u32) -> (u32, u32) {
        let old = self.nodes[self.root].clone();
        let height = old.h.max(h);
        let right = self.push(TreeNode::free(old.w, 0, w, height));
        let mut new_root = TreeNode::free(0, 0, old.w + w, height);
        new_root.used = true;
        new_root.down = Some(self.root);
        new_root.right = Some(right);
        self.root = self.push(new_root);
        self.place(w, h)
    }

    fn grow_down(&mut self, w: u32, h: u32) -> (u32, u32) {
        let old = self.nodes[self.root].clone();
        let width = old.w.max(w);
        let down = self.push(TreeNode::free(0, old.h, width, h));
        let mut new_root = TreeNode::free(0, 0, width, old.h + h);
        new_root.used = true;
        new_root.down = Some(down);
        new_root.right = Some(self.root);
        self.root = self.push(new_root);
        self.place(w, h)
    }

    fn push(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

fn binary_tree(boxes: &[(u32, u32)]) -> Placed {
    if boxes.is_empty() {
        return (Vec::new(), 0, 0);
    }

    // Largest side first; stable so equal boxes keep input order
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        let ma = boxes[a].0.max(boxes[a].1);
        let mb = boxes[b].0.max(boxes[b].1);
        mb.cmp(&ma)
    });

    let first = boxes[order[0]];
    let mut packer = GrowingPacker::new(first.0, first.1);
    let mut positions = vec![(0, 0); boxes.len()];

    for &idx in &order {
        let (w, h) = boxes[idx];
        positions[idx] = packer.place(w, h);
    }

    let root = &packer.nodes[packer.root];
    let width = positions
        .iter()
        .zip(boxes)
        .map(|(p, b)| p.0 + b.0)
        .max()
        .unwrap_or(0)
        .min(root.w);
    let height = positions
        .iter()
        .zip(boxes)
        .map(|(p, b)| p.1 + b.1)
        .max()
        .unwrap_or(0)
        .min(root.h);

    (positions, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: ((u32, u32), (u32, u32)), b: ((u32, u32), (u32, u32))) -> bool {
        let ((ax, ay), (aw, ah)) = a;
        let ((bx, by), (bw, bh)) = b;
        ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
    }

    fn assert_no_overlap(sizes: &[(u32, u32)], arrangement: &Arrangement) {
        for i in 0..sizes.len() {
            for j in (i + 1)..sizes.len() {
                assert!(
                    !overlaps(
                        (arrangement.positions[i], sizes[i]),
                        (arrangement.positions[j], sizes[j])
                    ),
                    "items {} and {} overlap: {:?}",
                    i,
                    j,
                    arrangement
                );
            }
        }
    }

    fn assert_within_canvas(sizes: &[(u32, u32)], arrangement: &Arrangement) {
        for (pos, size) in arrangement.positions.iter().zip(sizes) {
            assert!(pos.0 + size.0 <= arrangement.width);
            assert!(pos.1 + size.1 <= arrangement.height);
        }
    }

    #[test]
    fn test_top_down_with_padding() {
        let sizes = [(16, 16), (16, 16), (8, 20)];
        let a = arrange(&sizes, 10, Layout::TopDown);

        assert_eq!(a.positions, vec![(0, 0), (0, 26), (0, 52)]);
        assert_eq!((a.width, a.height), (16, 72));
    }

    #[test]
    fn test_left_right() {
        let sizes = [(16, 16), (8, 20)];
        let a = arrange(&sizes, 0, Layout::LeftRight);

        assert_eq!(a.positions, vec![(0, 0), (16, 0)]);
        assert_eq!((a.width, a.height), (24, 20));
    }

    #[test]
    fn test_diagonal() {
        let sizes = [(4, 4), (2, 6)];
        let a = arrange(&sizes, 0, Layout::Diagonal);

        assert_eq!(a.positions, vec![(0, 0), (4, 4)]);
        assert_eq!((a.width, a.height), (6, 10));
    }

    #[test]
    fn test_alt_diagonal() {
        let sizes = [(4, 4), (2, 6)];
        let a = arrange(&sizes, 0, Layout::AltDiagonal);

        assert_eq!(a.positions, vec![(0, 6), (4, 0)]);
        assert_eq!((a.width, a.height), (6, 10));
    }

    #[test]
    fn test_binary_tree_no_overlap() {
        let sizes = [(32, 32), (16, 16), (16, 16), (16, 16), (8, 40), (40, 8), (5, 5)];
        let a = arrange(&sizes, 2, Layout::BinaryTree);

        let padded: Vec<(u32, u32)> = sizes.iter().map(|&(w, h)| (w + 2, h + 2)).collect();
        assert_no_overlap(&padded, &a);
        assert_within_canvas(&sizes, &a);
    }

    #[test]
    fn test_binary_tree_packs_squares() {
        let sizes = [(8, 8); 4];
        let a = arrange(&sizes, 0, Layout::BinaryTree);

        assert_eq!((a.width, a.height), (16, 16));
    }

    #[test]
    fn test_all_layouts_stay_in_bounds() {
        let sizes = [(3, 7), (12, 2), (5, 5), (1, 1)];
        for layout in Layout::RASTER {
            let a = arrange(&sizes, 1, *layout);
            assert_no_overlap(&sizes, &a);
            assert_within_canvas(&sizes, &a);
        }
    }

    #[test]
    fn test_empty() {
        for layout in Layout::RASTER {
            let a = arrange(&[], 4, *layout);
            assert!(a.positions.is_empty());
            assert_eq!((a.width, a.height), (0, 0));
        }
    }
}
