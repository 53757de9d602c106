use crate::error::GraphError;
use crate::seeder::SeedSegment;
use crate::types::NodeId;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthNode {
    pub pos: Vec3,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Append-only forest of growth segments.
///
/// Every edge runs from an older node to a newer one, and every node has
/// at most one parent. Seed bases are the only roots a growth run creates.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthGraph {
    nodes: Vec<GrowthNode>,
}

impl GrowthNode {
    pub fn new_root(pos: Vec3) -> Self {
        Self {
            pos,
            parent: None,
            children: Vec::with_capacity(2),
        }
    }

    pub fn new_child(pos: Vec3, parent: NodeId) -> Self {
        Self {
            pos,
            parent: Some(parent),
            children: Vec::with_capacity(2),
        }
    }

    /// A tip has a parent and no children yet.
    pub fn is_tip(&self) -> bool {
        self.parent.is_some() && self.children.is_empty()
    }
}

impl GrowthGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[GrowthNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&GrowthNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.parent.is_some()).count()
    }

    /// Adds an unconnected node and returns its id.
    pub fn add_node(&mut self, pos: Vec3) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(GrowthNode::new_root(pos));
        id
    }

    /// Links `child` under `parent`.
    ///
    /// ### Returns
    /// - [`GraphError::UnknownNode`] if either id is not in the graph.
    /// - [`GraphError::SelfLoop`] if `parent == child`.
    /// - [`GraphError::AlreadyParented`] if `child` already has a parent.
    /// - [`GraphError::Backwards`] if `child` is older than `parent`. Edges
    ///   only run toward higher ids, which keeps the graph a forest.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        for id in [parent, child] {
            if id >= self.nodes.len() {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if parent == child {
            return Err(GraphError::SelfLoop(child));
        }
        if self.nodes[child].parent.is_some() {
            return Err(GraphError::AlreadyParented(child));
        }
        if child < parent {
            return Err(GraphError::Backwards { parent, child });
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Adds a node at `pos` linked under `parent`.
    ///
    /// ### Panics
    /// Panics if `parent` is not in the graph.
    pub fn add_child(&mut self, parent: NodeId, pos: Vec3) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(GrowthNode::new_child(pos, parent));
        self.nodes[parent].children.push(id);
        id
    }

    /// Adds a seed segment, returning `(base, tip)` ids.
    pub fn add_seed(&mut self, seed: &SeedSegment) -> (NodeId, NodeId) {
        let base = self.add_node(seed.base);
        let tip = self.add_child(base, seed.tip);
        (base, tip)
    }

    /// Position of a node.
    ///
    /// ### Panics
    /// Panics if `id` is not in the graph.
    pub fn position(&self, id: NodeId) -> Vec3 {
        self.nodes[id].pos
    }

    /// All current tips in ascending id order.
    ///
    /// Scans the whole graph; the result is a snapshot and is not updated
    /// by later insertions.
    pub fn tips(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.is_tip().then_some(id))
            .collect()
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.parent.is_none().then_some(id))
    }

    /// Directed `(parent, child)` pairs, ordered by child id.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.parent.map(|p| (p, id)))
    }

    /// Unit direction from the parent of `id` to `id`.
    pub fn parent_direction(&self, id: NodeId) -> Result<Vec3, GraphError> {
        let node = self.node(id).ok_or(GraphError::UnknownNode(id))?;
        let parent = node.parent.ok_or(GraphError::OrphanTip(id))?;
        (node.pos - self.nodes[parent].pos)
            .try_normalize()
            .ok_or(GraphError::Degenerate(id))
    }

    /// Sum of all segment lengths.
    pub fn total_length(&self) -> f32 {
        self.edges()
            .map(|(p, c)| self.nodes[p].pos.distance(self.nodes[c].pos))
            .sum()
    }

    /// Splits the forest into maximal unbranched polylines.
    ///
    /// Each strand starts at a root or a branch point and follows single
    /// children until it reaches a tip or another branch point. Every edge
    /// belongs to exactly one strand, and consecutive strands of a branch
    /// point share that point as their first node.
    pub fn strands(&self) -> Vec<Vec<NodeId>> {
        let mut strands = Vec::new();
        let mut pending: Vec<(NodeId, NodeId)> = Vec::new();

        for root in self.roots() {
            pending.extend(self.nodes[root].children.iter().rev().map(|&c| (root, c)));

            while let Some((from, mut cur)) = pending.pop() {
                let mut strand = vec![from, cur];
                while let &[only] = self.nodes[cur].children.as_slice() {
                    strand.push(only);
                    cur = only;
                }
                pending.extend(self.nodes[cur].children.iter().rev().map(|&c| (cur, c)));
                strands.push(strand);
            }
        }
        strands
    }
}
