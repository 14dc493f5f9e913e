//! Static path graph consumed by the movement core.
//!
//! A [`PathGraph`] is a set of [`Node`]s joined by axis-aligned [`Edge`]s.
//! It is immutable once built and shared read-only between every actor
//! update. Graphs are normally produced by level loading; the
//! [`PathGraphBuilder`] here validates whatever the host hands over and
//! precomputes the per-edge length, unit direction and [`Cardinal`].

use glam::Vec2;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::constants::MIN_EDGE_LENGTH;
use crate::direction::{Cardinal, EdgeDir};

/// Index of a node within its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Index of an edge within its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A graph vertex on the ground plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Identity of the node.
    pub id: NodeId,
    /// Ground-plane position (`x`, `z`).
    pub position: Vec2,
    /// Incident edges in insertion order.
    pub edges: Vec<EdgeId>,
}

/// An axis-aligned segment between two nodes.
///
/// `edge_t == 0.0` is at [`Edge::start`] (node [`Edge::from`]) and
/// `edge_t == 1.0` is at [`Edge::end`] (node [`Edge::to`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Identity of the edge.
    pub id: EdgeId,
    /// First endpoint.
    pub from: NodeId,
    /// Second endpoint.
    pub to: NodeId,
    /// Position of [`Edge::from`].
    pub start: Vec2,
    /// Position of [`Edge::to`].
    pub end: Vec2,
    /// Distance between the endpoints.
    pub length: f32,
    /// Unit vector from `start` to `end`.
    pub direction: Vec2,
    /// Cardinal classification of [`Edge::direction`].
    pub cardinal: Cardinal,
}

impl Edge {
    /// Ground-plane point at fraction `t`, clamped to the segment.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t.clamp(0.0, 1.0))
    }

    /// The node an actor reaches when travelling in `dir`.
    #[must_use]
    pub const fn node_towards(&self, dir: EdgeDir) -> NodeId {
        match dir {
            EdgeDir::Forward => self.to,
            EdgeDir::Backward => self.from,
        }
    }

    /// Cardinal heading of an actor travelling in `dir`.
    #[must_use]
    pub const fn heading(&self, dir: EdgeDir) -> Cardinal {
        match dir {
            EdgeDir::Forward => self.cardinal,
            EdgeDir::Backward => self.cardinal.opposite(),
        }
    }

    /// Projects `point` onto the segment, returning the clamped fraction and
    /// the projected point.
    #[must_use]
    pub fn project(&self, point: Vec2) -> (f32, Vec2) {
        let along = (point - self.start).dot(self.direction);
        let t = (along / self.length).clamp(0.0, 1.0);
        (t, self.point_at(t))
    }
}

/// A way out of a node: an incident edge and the sense to travel it in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exit {
    /// Edge to enter.
    pub edge: EdgeId,
    /// Heading once on the edge.
    pub heading: Cardinal,
    /// Travel sense once on the edge.
    pub edge_dir: EdgeDir,
}

impl Exit {
    /// The `edge_t` at which an actor enters the edge.
    #[must_use]
    pub const fn entry_t(&self) -> f32 {
        match self.edge_dir {
            EdgeDir::Forward => 0.0,
            EdgeDir::Backward => 1.0,
        }
    }
}

/// Reasons a graph description is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// A node position contains NaN or infinity.
    #[error("node position {0} is not finite")]
    NonFinitePosition(Vec2),
    /// An edge names a node that was never added.
    #[error("edge {index} references unknown node {node:?}")]
    UnknownNode {
        /// Insertion index of the edge.
        index: usize,
        /// The missing node.
        node: NodeId,
    },
    /// An edge starts and ends on the same node.
    #[error("edge {index} connects node {node:?} to itself")]
    SelfLoop {
        /// Insertion index of the edge.
        index: usize,
        /// The node at both ends.
        node: NodeId,
    },
    /// An edge is too short to traverse.
    #[error("edge {index} has length {length}, too short to traverse")]
    Degenerate {
        /// Insertion index of the edge.
        index: usize,
        /// Measured length.
        length: f32,
    },
    /// An edge is neither horizontal nor vertical.
    #[error("edge {index} from {start} to {end} is not axis-aligned")]
    NotAxisAligned {
        /// Insertion index of the edge.
        index: usize,
        /// First endpoint position.
        start: Vec2,
        /// Second endpoint position.
        end: Vec2,
    },
    /// Two edges join the same pair of nodes.
    #[error("edge {index} duplicates the connection between {a:?} and {b:?}")]
    DuplicateEdge {
        /// Insertion index of the edge.
        index: usize,
        /// One endpoint.
        a: NodeId,
        /// The other endpoint.
        b: NodeId,
    },
}

/// Immutable network of nodes and edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl PathGraph {
    /// A graph with no nodes or edges.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Starts describing a new graph.
    #[must_use]
    pub fn builder() -> PathGraphBuilder {
        PathGraphBuilder::default()
    }

    /// Builds a rectangular lattice of `cols × rows` nodes spaced `spacing`
    /// apart, with every horizontal and vertical neighbour connected.
    ///
    /// Node `(c, r)` sits at `(c * spacing, r * spacing)`.
    ///
    /// # Errors
    /// Returns [`GraphError::Degenerate`] when `spacing` is too small to form
    /// edges, or [`GraphError::NonFinitePosition`] for non-finite spacing.
    ///
    /// # Examples
    /// ```
    /// use pathchase::PathGraph;
    /// let graph = PathGraph::lattice(3, 2, 10.0).expect("valid lattice");
    /// assert_eq!(graph.nodes().len(), 6);
    /// assert_eq!(graph.edges().len(), 7);
    /// ```
    pub fn lattice(cols: usize, rows: usize, spacing: f32) -> Result<Self, GraphError> {
        let mut builder = Self::builder();
        let mut ids = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            for c in 0..cols {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "Lattice dimensions are far below f32 precision limits."
                )]
                let position = Vec2::new(c as f32 * spacing, r as f32 * spacing);
                ids.push(builder.node(position));
            }
        }
        for r in 0..rows {
            for c in 0..cols {
                let here = ids.get(r * cols + c).copied();
                let right = (c + 1 < cols)
                    .then(|| ids.get(r * cols + c + 1).copied())
                    .flatten();
                let below = (r + 1 < rows)
                    .then(|| ids.get((r + 1) * cols + c).copied())
                    .flatten();
                if let Some(here) = here {
                    for neighbour in [right, below].into_iter().flatten() {
                        builder.edge(here, neighbour);
                    }
                }
            }
        }
        builder.build()
    }

    /// `true` when the graph has no edges to travel on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All nodes, indexed by [`NodeId`].
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, indexed by [`EdgeId`].
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Looks up an edge.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Every way out of `node`, in incident-edge order.
    ///
    /// The edge an actor arrived on is included, travelled in reverse.
    #[must_use]
    pub fn exits(&self, node: NodeId) -> Vec<Exit> {
        let Some(node) = self.node(node) else {
            return Vec::new();
        };
        node.edges
            .iter()
            .filter_map(|&id| self.edge(id))
            .map(|edge| {
                let edge_dir = if edge.from == node.id {
                    EdgeDir::Forward
                } else {
                    EdgeDir::Backward
                };
                Exit {
                    edge: edge.id,
                    heading: edge.heading(edge_dir),
                    edge_dir,
                }
            })
            .collect()
    }
}

/// Incremental description of a [`PathGraph`].
///
/// Nodes placed at identical coordinates are merged, so callers may describe
/// a network as a list of segments without tracking node identities.
#[derive(Debug, Default)]
pub struct PathGraphBuilder {
    positions: Vec<Vec2>,
    index: HashMap<(OrderedFloat<f32>, OrderedFloat<f32>), NodeId>,
    links: Vec<(NodeId, NodeId)>,
}

impl PathGraphBuilder {
    /// Adds a node at `position`, or returns the existing node there.
    pub fn node(&mut self, position: Vec2) -> NodeId {
        let key = (OrderedFloat(position.x), OrderedFloat(position.y));
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.positions.len());
        self.positions.push(position);
        self.index.insert(key, id);
        id
    }

    /// Connects two nodes. Validation is deferred to [`Self::build`].
    pub fn edge(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        self.links.push((a, b));
        self
    }

    /// Adds a segment between two positions, creating nodes as needed.
    pub fn segment(&mut self, start: Vec2, end: Vec2) -> &mut Self {
        let a = self.node(start);
        let b = self.node(end);
        self.edge(a, b)
    }

    /// Validates the description and precomputes edge geometry.
    ///
    /// # Errors
    /// Returns the first [`GraphError`] found, checking nodes before edges
    /// and edges in insertion order.
    pub fn build(self) -> Result<PathGraph, GraphError> {
        if let Some(&bad) = self.positions.iter().find(|p| !p.is_finite()) {
            return Err(GraphError::NonFinitePosition(bad));
        }

        let mut nodes: Vec<Node> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Node {
                id: NodeId(i),
                position,
                edges: Vec::new(),
            })
            .collect();
        let mut edges = Vec::with_capacity(self.links.len());
        let mut seen = HashMap::with_capacity(self.links.len());

        for (index, &(a, b)) in self.links.iter().enumerate() {
            let start = self
                .positions
                .get(a.0)
                .copied()
                .ok_or(GraphError::UnknownNode { index, node: a })?;
            let end = self
                .positions
                .get(b.0)
                .copied()
                .ok_or(GraphError::UnknownNode { index, node: b })?;
            if a == b {
                return Err(GraphError::SelfLoop { index, node: a });
            }
            if seen.insert((a.min(b), a.max(b)), index).is_some() {
                return Err(GraphError::DuplicateEdge { index, a, b });
            }

            let length = start.distance(end);
            if length < MIN_EDGE_LENGTH {
                return Err(GraphError::Degenerate { index, length });
            }
            let cardinal = Cardinal::from_vector(end - start).ok_or(
                GraphError::NotAxisAligned { index, start, end },
            )?;
            // Snap the stored direction to the exact axis.
            let direction = cardinal.to_vec2();

            let id = EdgeId(edges.len());
            for endpoint in [a, b] {
                if let Some(node) = nodes.get_mut(endpoint.0) {
                    node.edges.push(id);
                }
            }
            edges.push(Edge {
                id,
                from: a,
                to: b,
                start,
                end,
                length,
                direction,
                cardinal,
            });
        }

        log::debug!(
            "built path graph with {} nodes and {} edges",
            nodes.len(),
            edges.len()
        );
        Ok(PathGraph { nodes, edges })
    }
}
