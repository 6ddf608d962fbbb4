//! Directed edges of the wider mapping graph.
//!
//! A [`Link`] records how two graph nodes are related and the rigid transform
//! between them. It is a passive value: constructed once, queried, never
//! mutated.

use nalgebra::Isometry3;

/// Classification of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Consecutive nodes in odometry order.
    Neighbor,
    /// Loop closure found by global appearance matching.
    GlobalClosure,
    /// Loop closure found by searching nearby in space.
    LocalSpaceClosure,
    /// Loop closure found by searching nearby in time.
    LocalTimeClosure,
    /// Closure added manually by the user.
    UserClosure,
    Undefined,
}

/// Immutable directed edge between two graph nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    from: i32,
    to: i32,
    transform: Option<Isometry3<f32>>,
    kind: LinkKind,
}

impl Default for Link {
    /// The invalid placeholder link.
    fn default() -> Self {
        Self {
            from: 0,
            to: 0,
            transform: None,
            kind: LinkKind::Undefined,
        }
    }
}

impl Link {
    pub fn new(from: i32, to: i32, transform: Isometry3<f32>, kind: LinkKind) -> Self {
        Self {
            from,
            to,
            transform: Some(transform),
            kind,
        }
    }

    /// A link is usable by the graph iff both endpoints are assigned node
    /// ids, it carries a transform and its kind is known.
    pub fn is_valid(&self) -> bool {
        self.from > 0 && self.to > 0 && self.transform.is_some() && self.kind != LinkKind::Undefined
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    pub fn transform(&self) -> Option<&Isometry3<f32>> {
        self.transform.as_ref()
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }
}
