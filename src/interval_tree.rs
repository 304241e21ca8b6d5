//! An augmented red-black tree of half-open `[start, end)` spans, each
//! carrying an attribute value `T`. Nodes are ordered by interval *length*
//! rather than position (ties broken by insertion order), with each node
//! additionally tracking the position envelope of its subtree so that
//! position-based queries can prune branches that cannot possibly match.
//!
//! The pointer graph of a traditional intrusive tree is replaced by an
//! arena of nodes addressed by index, and the four search modes below share
//! a single explicit worklist walk rather than four separate iterator
//! types.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Opaque handle to a span stored in an [`IntervalTree`]. Stable across
/// [`IntervalTree::move_span`] but invalidated by [`IntervalTree::remove`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct SpanId(u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

struct Node<T> {
    offset: isize, // start, relative to parent's start (absolute at the root)
    length: usize, // end - start; the BST ordering key
    min_offset: isize, // subtree envelope, relative to this node's own start
    max_offset: isize,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    seq: u64, // insertion sequence, breaks ties in the length ordering
    value: Option<T>,
}

/// A search mode for [`IntervalTree::search`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchMode {
    /// Stored spans that entirely contain `[start, end)`.
    Outer,
    /// Stored spans entirely contained by `[start, end)`.
    Inner,
    /// Stored spans that overlap `[start, end)` at any point.
    Overlap,
    /// Stored spans exactly equal to `[start, end)`.
    Equal,
}

pub struct IntervalTree<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    next_seq: u64,
}

impl<T> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalTree<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), free: Vec::new(), root: None, next_seq: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].left
    }
    fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].right
    }
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].parent
    }
    fn offset(&self, id: NodeId) -> isize {
        self.nodes[id.idx()].offset
    }
    fn length(&self, id: NodeId) -> usize {
        self.nodes[id.idx()].length
    }
    fn color(&self, id: NodeId) -> Color {
        self.nodes[id.idx()].color
    }
    fn min_offset(&self, id: NodeId) -> isize {
        self.nodes[id.idx()].min_offset
    }
    fn max_offset(&self, id: NodeId) -> isize {
        self.nodes[id.idx()].max_offset
    }
    fn seq(&self, id: NodeId) -> u64 {
        self.nodes[id.idx()].seq
    }

    fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id.idx()].left = child;
        if let Some(c) = child {
            self.nodes[c.idx()].parent = Some(id);
        }
    }
    fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id.idx()].right = child;
        if let Some(c) = child {
            self.nodes[c.idx()].parent = Some(id);
        }
    }
    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.idx()].parent = parent;
    }
    fn set_offset(&mut self, id: NodeId, offset: isize) {
        self.nodes[id.idx()].offset = offset;
    }
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id.idx()].color = color;
    }
    fn set_min_max(&mut self, id: NodeId, min: isize, max: isize) {
        self.nodes[id.idx()].min_offset = min;
        self.nodes[id.idx()].max_offset = max;
    }

    fn abs_start(&self, id: NodeId) -> isize {
        let mut pos = 0isize;
        let mut cur = id;
        loop {
            pos += self.offset(cur);
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return pos,
            }
        }
    }

    /// Recomputes `id`'s own envelope from its children and its own
    /// `[0, length)`. Returns whether anything changed.
    fn recompute_min_max(&mut self, id: NodeId) -> bool {
        let mut min = 0isize;
        let mut max = self.length(id) as isize;
        if let Some(l) = self.left(id) {
            min = min.min(self.min_offset(l) + self.offset(l));
            max = max.max(self.max_offset(l) + self.offset(l));
        }
        if let Some(r) = self.right(id) {
            min = min.min(self.min_offset(r) + self.offset(r));
            max = max.max(self.max_offset(r) + self.offset(r));
        }
        let changed = min != self.min_offset(id) || max != self.max_offset(id);
        self.set_min_max(id, min, max);
        changed
    }

    fn update_min_max_recursive(&mut self, mut id: Option<NodeId>) {
        while let Some(nid) = id {
            if !self.recompute_min_max(nid) {
                return;
            }
            id = self.parent(nid);
        }
    }

    fn alloc_node(&mut self, offset: isize, length: usize, value: T) -> NodeId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let node = Node {
            offset,
            length,
            min_offset: 0,
            max_offset: length as isize,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            seq,
            value: Some(value),
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.idx()] = node;
            id
        } else {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(node);
            id
        }
    }

    fn free_node(&mut self, id: NodeId) -> T {
        let value = self.nodes[id.idx()].value.take().expect("node already freed");
        self.free.push(id);
        value
    }

    /// Insert `[start, end)` with `value`, returning a stable handle.
    pub fn insert(&mut self, start: usize, end: usize, value: T) -> SpanId {
        let length = end.saturating_sub(start);
        let id = self.insert_node(start as isize, length, value);
        SpanId(id.0)
    }

    fn insert_node(&mut self, offset: isize, length: usize, value: T) -> NodeId {
        let node = self.alloc_node(offset, length, value);

        let Some(root) = self.root else {
            self.set_color(node, Color::Black);
            self.nodes[node.idx()].offset = offset;
            self.root = Some(node);
            return node;
        };

        let mut parent = root;
        let mut rel_offset = offset;
        loop {
            rel_offset -= self.offset(parent);
            let go_left = (self.length(parent), self.seq(parent)) > (length, self.seq(node));
            if go_left {
                match self.left(parent) {
                    Some(l) => parent = l,
                    None => {
                        self.set_left(parent, Some(node));
                        break;
                    }
                }
            } else {
                match self.right(parent) {
                    Some(r) => parent = r,
                    None => {
                        self.set_right(parent, Some(node));
                        break;
                    }
                }
            }
        }
        self.set_offset(node, rel_offset);

        self.update_min_max_recursive(Some(parent));
        self.fix_for_insert(node);
        node
    }

    fn fix_for_insert(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            self.set_color(node, Color::Black);
            return;
        };

        self.set_color(node, Color::Red);
        if self.color(parent) == Color::Black {
            return;
        }

        let grandparent = self.parent(parent).unwrap();
        let parent_is_left = self.left(grandparent) == Some(parent);
        let uncle = if parent_is_left { self.right(grandparent) } else { self.left(grandparent) };

        if let Some(u) = uncle {
            if self.color(u) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(u, Color::Black);
                self.set_color(grandparent, Color::Red);
                self.fix_for_insert(grandparent);
                return;
            }
        }

        if Some(node) == self.right(parent) && parent_is_left {
            self.rotate_left(parent);
            self.fix_for_insert_rotate(parent);
        } else if Some(node) == self.left(parent) && !parent_is_left {
            self.rotate_right(parent);
            self.fix_for_insert_rotate(parent);
        } else {
            self.fix_for_insert_rotate(node);
        }
    }

    fn fix_for_insert_rotate(&mut self, node: NodeId) {
        let parent = self.parent(node).unwrap();
        let grandparent = self.parent(parent).unwrap();

        if Some(node) == self.left(parent) {
            self.rotate_right(grandparent);
        } else {
            self.rotate_left(grandparent);
        }

        self.set_color(parent, Color::Black);
        self.set_color(grandparent, Color::Red);
    }

    fn rotate_left(&mut self, pivot: NodeId) {
        let new_pivot = self.right(pivot).unwrap();
        let parent = self.parent(pivot);
        let child = self.left(new_pivot);
        // `child` moves from under `new_pivot` to under `pivot`; its offset
        // is relative to its parent, so it shifts by `new_pivot`'s old offset.
        // Its own min/max envelope is relative to itself, so that's unaffected.
        if let Some(c) = child {
            self.set_offset(c, self.offset(c) + self.offset(new_pivot));
        }
        self.set_right(pivot, child);
        self.set_left(new_pivot, Some(pivot));
        self.fix_for_rotate(pivot, new_pivot, parent);
    }

    fn rotate_right(&mut self, pivot: NodeId) {
        let new_pivot = self.left(pivot).unwrap();
        let parent = self.parent(pivot);
        let child = self.right(new_pivot);
        if let Some(c) = child {
            self.set_offset(c, self.offset(c) + self.offset(new_pivot));
        }
        self.set_left(pivot, child);
        self.set_right(new_pivot, Some(pivot));
        self.fix_for_rotate(pivot, new_pivot, parent);
    }

    fn fix_for_rotate(&mut self, old_pivot: NodeId, new_pivot: NodeId, parent: Option<NodeId>) {
        let old_offset = self.offset(old_pivot);
        let new_offset = self.offset(new_pivot);

        self.set_offset(old_pivot, -new_offset);
        self.set_offset(new_pivot, old_offset + new_offset);

        self.set_min_max(
            new_pivot,
            self.min_offset(old_pivot) - new_offset,
            self.max_offset(old_pivot) - new_offset,
        );
        self.recompute_min_max(old_pivot);

        match parent {
            None => {
                self.root = Some(new_pivot);
                self.set_parent(new_pivot, None);
            }
            Some(p) => {
                if self.left(p) == Some(old_pivot) {
                    self.set_left(p, Some(new_pivot));
                } else {
                    self.set_right(p, Some(new_pivot));
                }
            }
        }
    }

    fn find_node(&self, id: SpanId) -> NodeId {
        NodeId(id.0)
    }

    /// The `(start, end)` span currently held by `id`.
    pub fn span(&self, id: SpanId) -> Option<(usize, usize)> {
        let node = self.find_node(id);
        self.nodes.get(node.idx())?.value.as_ref()?;
        let start = self.abs_start(node);
        Some((start as usize, (start + self.length(node) as isize) as usize))
    }

    pub fn get(&self, id: SpanId) -> Option<&T> {
        self.nodes.get(id.0 as usize)?.value.as_ref()
    }

    pub fn get_mut(&mut self, id: SpanId) -> Option<&mut T> {
        self.nodes.get_mut(id.0 as usize)?.value.as_mut()
    }

    /// Remove and return the value at `id`.
    pub fn remove(&mut self, id: SpanId) -> Option<T> {
        let node = self.find_node(id);
        if self.nodes.get(node.idx())?.value.is_none() {
            return None;
        }
        Some(self.extract(node))
    }

    /// Move the span at `id` to `[new_start, new_end)`, preserving its
    /// handle and value.
    pub fn move_span(&mut self, id: SpanId, new_start: usize, new_end: usize) {
        let node = self.find_node(id);
        let value = self.extract(node);
        let length = new_end.saturating_sub(new_start);
        let new_node = self.insert_node(new_start as isize, length, value);
        debug_assert_eq!(new_node, node, "move_span must keep the same arena slot");
    }

    fn extract(&mut self, node: NodeId) -> T {
        let removed_color = self.color(node);

        match (self.left(node), self.right(node)) {
            (Some(left_child), Some(right_child)) => {
                let mut next = right_child;
                while let Some(l) = self.left(next) {
                    next = l;
                }
                let x = self.right(next);
                let y_color = self.color(next);
                let y_parent = self.parent(next).unwrap();

                let abs_node = self.abs_start(node);
                let abs_next = self.abs_start(next);
                let abs_x = x.map(|n| self.abs_start(n));
                let abs_left = self.abs_start(left_child);
                let abs_right = self.abs_start(right_child);
                let abs_y_parent = self.abs_start(y_parent);
                let gp = self.parent(node);
                let abs_gp = gp.map(|g| self.abs_start(g));
                let node_was_left = gp.map(|g| self.left(g) == Some(node));
                let _ = abs_node;

                if y_parent != node {
                    self.set_left(y_parent, x);
                    self.set_right(next, Some(right_child));
                    self.set_offset(right_child, abs_right - abs_next);
                    if let Some(xx) = x {
                        self.set_offset(xx, abs_x.unwrap() - abs_y_parent);
                    }
                    if let Some(xx) = x {
                        self.recompute_min_max(xx);
                    }
                    self.recompute_min_max(right_child);
                }
                self.set_left(next, Some(left_child));
                self.set_offset(left_child, abs_left - abs_next);
                self.recompute_min_max(left_child);

                match gp {
                    Some(g) => {
                        if node_was_left.unwrap() {
                            self.set_left(g, Some(next));
                        } else {
                            self.set_right(g, Some(next));
                        }
                    }
                    None => {
                        self.root = Some(next);
                        self.set_parent(next, None);
                    }
                }
                self.set_offset(next, abs_next - abs_gp.unwrap_or(0));
                self.set_color(next, removed_color);

                let side_start = if y_parent != node { y_parent } else { next };
                self.update_min_max_recursive(Some(side_start));
                self.update_min_max_recursive(Some(next));

                if y_color == Color::Black {
                    match x {
                        Some(xx) if self.color(xx) == Color::Red => self.set_color(xx, Color::Black),
                        _ => {
                            let (p, is_left) =
                                if y_parent != node { (y_parent, true) } else { (next, false) };
                            self.fix_for_erase_at(p, is_left);
                        }
                    }
                }
            }
            (child, None) | (None, child) => {
                let parent = self.parent(node);
                let abs_child = child.map(|c| self.abs_start(c));
                let abs_parent = parent.map(|p| self.abs_start(p));
                let node_was_left = parent.map(|p| self.left(p) == Some(node));

                match parent {
                    Some(p) => {
                        if node_was_left.unwrap() {
                            self.set_left(p, child);
                        } else {
                            self.set_right(p, child);
                        }
                        if let Some(c) = child {
                            self.set_offset(c, abs_child.unwrap() - abs_parent.unwrap());
                        }
                        self.update_min_max_recursive(Some(p));
                    }
                    None => {
                        self.root = child;
                        if let Some(c) = child {
                            self.set_parent(c, None);
                            self.recompute_min_max(c);
                        }
                    }
                }

                if removed_color == Color::Black {
                    match child {
                        Some(c) if self.color(c) == Color::Red => self.set_color(c, Color::Black),
                        _ => {
                            if let Some(p) = parent {
                                self.fix_for_erase_at(p, node_was_left.unwrap());
                            }
                        }
                    }
                }
            }
        }

        self.free_node(node)
    }

    fn fix_for_erase_at(&mut self, parent: NodeId, is_left: bool) {
        let side = |this: &Self, p: NodeId| if is_left { this.right(p) } else { this.left(p) };

        let mut sibling = side(self, parent).unwrap();
        if self.color(sibling) == Color::Red {
            self.set_color(parent, Color::Red);
            self.set_color(sibling, Color::Black);
            if is_left {
                self.rotate_left(parent);
            } else {
                self.rotate_right(parent);
            }
            sibling = side(self, parent).unwrap();
        }

        let sib_black_children = |this: &Self, s: NodeId| {
            this.left(s).map_or(true, |l| this.color(l) == Color::Black)
                && this.right(s).map_or(true, |r| this.color(r) == Color::Black)
        };

        if self.color(parent) == Color::Black
            && self.color(sibling) == Color::Black
            && sib_black_children(self, sibling)
        {
            self.set_color(sibling, Color::Red);
            if let Some(gp) = self.parent(parent) {
                let parent_is_left = self.left(gp) == Some(parent);
                self.fix_for_erase_at(gp, parent_is_left);
            }
            return;
        }

        if self.color(parent) == Color::Red
            && self.color(sibling) == Color::Black
            && sib_black_children(self, sibling)
        {
            self.set_color(sibling, Color::Red);
            self.set_color(parent, Color::Black);
            return;
        }

        if self.color(sibling) == Color::Black {
            if is_left
                && self.right(sibling).map_or(true, |r| self.color(r) == Color::Black)
                && self.left(sibling).map_or(false, |l| self.color(l) == Color::Red)
            {
                self.set_color(sibling, Color::Red);
                self.set_color(self.left(sibling).unwrap(), Color::Black);
                self.rotate_right(sibling);
            } else if !is_left
                && self.left(sibling).map_or(true, |l| self.color(l) == Color::Black)
                && self.right(sibling).map_or(false, |r| self.color(r) == Color::Red)
            {
                self.set_color(sibling, Color::Red);
                self.set_color(self.right(sibling).unwrap(), Color::Black);
                self.rotate_left(sibling);
            }
            sibling = side(self, parent).unwrap();
        }

        self.set_color(sibling, self.color(parent));
        self.set_color(parent, Color::Black);
        if is_left {
            if let Some(r) = self.right(sibling) {
                self.set_color(r, Color::Black);
            }
            self.rotate_left(parent);
        } else {
            if let Some(l) = self.left(sibling) {
                self.set_color(l, Color::Black);
            }
            self.rotate_right(parent);
        }
    }

    /// Every stored span matching `mode` against `[start, end)`, as
    /// `(id, start, end)` triples. Walks the tree with an explicit
    /// worklist, pruning subtrees whose position envelope cannot match.
    pub fn search(&self, mode: SearchMode, start: usize, end: usize) -> Vec<(SpanId, usize, usize)> {
        let (start, end) = (start as isize, end as isize);
        let mut out = Vec::new();
        let Some(root) = self.root else { return out };

        let mut stack = vec![(root, self.offset(root))];
        while let Some((id, abs)) = stack.pop() {
            let env_lo = abs + self.min_offset(id);
            let env_hi = abs + self.max_offset(id);
            if env_hi <= start || env_lo >= end {
                // Every interval under `id` is disjoint from [start, end), so
                // none of them can overlap, contain, or be contained by it
                // either — safe to prune for all four search modes.
                continue;
            }

            let node_start = abs;
            let node_end = abs + self.length(id) as isize;
            let matches = match mode {
                SearchMode::Outer => node_start <= start && node_end >= end,
                SearchMode::Inner => node_start >= start && node_end <= end,
                SearchMode::Overlap => node_start < end && node_end > start,
                SearchMode::Equal => node_start == start && node_end == end,
            };
            if matches {
                out.push((SpanId(id.0), node_start as usize, node_end as usize));
            }

            if let Some(l) = self.left(id) {
                stack.push((l, abs + self.offset(l)));
            }
            if let Some(r) = self.right(id) {
                stack.push((r, abs + self.offset(r)));
            }
        }
        out
    }

    /// Every stored span, as `(id, start, end)` triples, shortest first.
    pub fn iter_all(&self) -> Vec<(SpanId, usize, usize)> {
        let mut out = Vec::new();
        let Some(root) = self.root else { return out };
        let mut stack = vec![(root, self.offset(root))];
        while let Some((id, abs)) = stack.pop() {
            out.push((SpanId(id.0), abs as usize, (abs + self.length(id) as isize) as usize));
            if let Some(l) = self.left(id) {
                stack.push((l, abs + self.offset(l)));
            }
            if let Some(r) = self.right(id) {
                stack.push((r, abs + self.offset(r)));
            }
        }
        out.sort_by_key(|(_, s, _)| *s);
        out
    }

    /// Adjust every stored span for a document edit of `delta` chars at
    /// `pos`. On insertion (`delta > 0`) a span that strictly contains `pos`
    /// grows to absorb the inserted text; spans starting at or after `pos`
    /// shift right. On deletion (`delta < 0`, removing `[pos, pos - delta)`)
    /// spans entirely inside the deleted range are dropped, spans straddling
    /// an edge are clipped, and spans after the deletion shift left.
    pub fn shift(&mut self, pos: usize, delta: isize) {
        if self.root.is_none() || delta == 0 {
            return;
        }
        let pos = pos as isize;
        let all = self.iter_all();

        if delta > 0 {
            for (id, start, end) in all {
                let (start, end) = (start as isize, end as isize);
                let (new_start, new_end) = if start >= pos {
                    (start + delta, end + delta)
                } else if end > pos {
                    (start, end + delta)
                } else {
                    continue;
                };
                self.move_span(id, new_start as usize, new_end as usize);
            }
        } else {
            let cut_len = -delta;
            let cut_end = pos + cut_len;
            for (id, start, end) in all {
                let (start, end) = (start as isize, end as isize);
                if start >= cut_end {
                    self.move_span(id, (start - cut_len) as usize, (end - cut_len) as usize);
                } else if end <= pos {
                    continue;
                } else if start >= pos && end <= cut_end {
                    self.remove(id);
                } else if start < pos && end > cut_end {
                    self.move_span(id, start as usize, (end - cut_len) as usize);
                } else if start < pos {
                    // Tail of the span falls inside the cut; clip to `pos`.
                    self.move_span(id, start as usize, pos as usize);
                } else {
                    // Head of the span falls inside the cut; the remainder
                    // starts where the cut collapses to, at `pos`.
                    self.move_span(id, pos as usize, (end - cut_len) as usize);
                }
            }
        }
    }

    #[cfg(test)]
    fn check(&self) {
        fn walk<T>(
            tree: &IntervalTree<T>,
            id: Option<NodeId>,
            parent: Option<NodeId>,
            base: isize,
            out: &mut Vec<(usize, isize, isize)>,
        ) {
            let Some(id) = id else { return };
            assert_eq!(tree.parent(id), parent);
            let abs = base + tree.offset(id);
            let l = tree.left(id);
            let r = tree.right(id);
            if let Some(l) = l {
                assert!((tree.length(l), tree.seq(l)) <= (tree.length(id), tree.seq(id)));
            }
            if let Some(r) = r {
                assert!((tree.length(r), tree.seq(r)) >= (tree.length(id), tree.seq(id)));
            }
            walk(tree, l, Some(id), abs, out);
            out.push((id.idx(), abs, abs + tree.length(id) as isize));
            walk(tree, r, Some(id), abs, out);

            let mut min = 0isize;
            let mut max = tree.length(id) as isize;
            if let Some(l) = l {
                min = min.min(tree.min_offset(l) + tree.offset(l));
                max = max.max(tree.max_offset(l) + tree.offset(l));
            }
            if let Some(r) = r {
                min = min.min(tree.min_offset(r) + tree.offset(r));
                max = max.max(tree.max_offset(r) + tree.offset(r));
            }
            assert_eq!((tree.min_offset(id), tree.max_offset(id)), (min, max));

            if tree.color(id) == Color::Red {
                let red_child_black =
                    |c: Option<NodeId>| c.map_or(true, |c| tree.color(c) == Color::Black);
                assert!(red_child_black(l) && red_child_black(r));
            }
        }

        let mut out = Vec::new();
        walk(self, self.root, None, 0, &mut out);
        if let Some(root) = self.root {
            assert_eq!(self.color(root), Color::Black);
        }
    }
}
