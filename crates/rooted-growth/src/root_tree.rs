//! Arena-backed tree of root branches.
//!
//! Every branch is a polyline of [`RootPoint`]s. Branches reference their
//! parent and children by [`RootId`], so the tree has no owning cycles and
//! all aggregation walks are iterative.

use glam::Vec2;

use crate::error::GrowthError;
use crate::width_curve::WidthCurve;

/// A sample along a branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootPoint {
    /// World position.
    pub position: Vec2,
    /// Branch width at this point.
    pub width: f32,
}

impl RootPoint {
    /// Creates a point.
    pub fn new(position: Vec2, width: f32) -> Self {
        Self { position, width }
    }
}

/// Index of a branch inside a [`RootTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub usize);

/// One branch of the tree.
#[derive(Debug, Clone)]
pub struct Root {
    points: Vec<RootPoint>,
    length: f32,
    width_curve: WidthCurve,
    parent: Option<RootId>,
    children: Vec<RootId>,
    retired: bool,
}

impl Root {
    fn seeded(seed: RootPoint, parent: Option<RootId>) -> Self {
        Self {
            points: vec![seed],
            length: 0.0,
            width_curve: WidthCurve::default(),
            parent,
            children: Vec::new(),
            retired: false,
        }
    }

    /// Points in growth order. The first point is the seed.
    pub fn points(&self) -> &[RootPoint] {
        &self.points
    }

    /// Sum of distances between consecutive points.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Width profile along the branch.
    pub fn width_curve(&self) -> &WidthCurve {
        &self.width_curve
    }

    /// Parent branch, or `None` for a tree root.
    pub fn parent(&self) -> Option<RootId> {
        self.parent
    }

    /// Returns `true` if this branch was split off another branch.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Direct children in creation order.
    pub fn children(&self) -> &[RootId] {
        &self.children
    }

    /// A branch is grown once it has a point beyond its seed.
    pub fn is_grown(&self) -> bool {
        self.points.len() > 1
    }

    /// Returns `true` if growth on this branch was abandoned.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    fn awaits_growth(&self) -> bool {
        !self.is_grown() && !self.retired
    }

    /// Lowest row reached by this branch alone: the minimum `ceil(y)` over
    /// points below the surface, or zero.
    fn own_lowest_depth(&self) -> i32 {
        self.points
            .iter()
            .filter(|p| p.position.y < 0.0)
            .map(|p| p.position.y.ceil() as i32)
            .fold(0, i32::min)
    }
}

/// All branches grown during one day.
#[derive(Debug, Clone, Default)]
pub struct RootTree {
    roots: Vec<Root>,
}

impl RootTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of branches.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if no branch was spawned yet.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Spawns a parentless branch seeded at `position`.
    pub fn spawn_root(&mut self, position: Vec2, width: f32) -> RootId {
        let id = RootId(self.roots.len());
        self.roots
            .push(Root::seeded(RootPoint::new(position, width), None));
        id
    }

    /// Spawns a child branch of `parent`, seeded at `position`.
    pub fn add_child(
        &mut self,
        parent: RootId,
        position: Vec2,
        width: f32,
    ) -> Result<RootId, GrowthError> {
        let id = RootId(self.roots.len());
        self.root_mut(parent)?.children.push(id);
        self.roots
            .push(Root::seeded(RootPoint::new(position, width), Some(parent)));
        tracing::trace!(parent = parent.0, child = id.0, "Split root");
        Ok(id)
    }

    /// Appends a point to a branch, updating its length and width curve.
    pub fn add_point(&mut self, id: RootId, point: RootPoint) -> Result<(), GrowthError> {
        let root = self.root_mut(id)?;
        if let Some(last) = root.points.last() {
            root.length += last.position.distance(point.position);
        }
        root.points.push(point);
        root.width_curve = WidthCurve::from_points(&root.points, root.length);
        Ok(())
    }

    /// Marks a branch as abandoned so it is never offered for growth again.
    pub fn retire(&mut self, id: RootId) -> Result<(), GrowthError> {
        self.root_mut(id)?.retired = true;
        Ok(())
    }

    /// The branch behind `id`.
    pub fn root(&self, id: RootId) -> Result<&Root, GrowthError> {
        self.roots.get(id.0).ok_or(GrowthError::UnknownRoot(id))
    }

    fn root_mut(&mut self, id: RootId) -> Result<&mut Root, GrowthError> {
        self.roots.get_mut(id.0).ok_or(GrowthError::UnknownRoot(id))
    }

    /// Points of a branch.
    pub fn points(&self, id: RootId) -> Result<&[RootPoint], GrowthError> {
        Ok(self.root(id)?.points())
    }

    /// Width curve of a branch.
    pub fn width_curve(&self, id: RootId) -> Result<&WidthCurve, GrowthError> {
        Ok(self.root(id)?.width_curve())
    }

    /// Parent of a branch.
    pub fn parent(&self, id: RootId) -> Result<Option<RootId>, GrowthError> {
        Ok(self.root(id)?.parent())
    }

    /// Direct children of a branch.
    pub fn children(&self, id: RootId) -> Result<&[RootId], GrowthError> {
        Ok(self.root(id)?.children())
    }

    /// First branch still waiting to grow, searching the children of `from`
    /// and then those of each ancestor in turn.
    ///
    /// `None` means nothing is left to grow.
    pub fn ungrown_root(&self, from: RootId) -> Result<Option<RootId>, GrowthError> {
        let mut current = Some(from);
        while let Some(id) = current {
            let root = self.root(id)?;
            for &child in &root.children {
                if self.root(child)?.awaits_growth() {
                    return Ok(Some(child));
                }
            }
            current = root.parent;
        }
        Ok(None)
    }

    /// `id` followed by every descendant, depth first.
    fn subtree(&self, id: RootId) -> Result<Vec<RootId>, GrowthError> {
        self.root(id)?;
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            order.push(next);
            let root = self.root(next)?;
            stack.extend(root.children.iter().rev().copied());
        }
        Ok(order)
    }

    /// Length of a branch plus the lengths of all its descendants.
    pub fn total_length(&self, id: RootId) -> Result<f32, GrowthError> {
        let mut total = 0.0;
        for branch in self.subtree(id)? {
            total += self.root(branch)?.length;
        }
        Ok(total)
    }

    /// Lowest row reached anywhere in the subtree, or zero if it never went
    /// below the surface.
    pub fn lowest_depth(&self, id: RootId) -> Result<i32, GrowthError> {
        let mut lowest = 0;
        for branch in self.subtree(id)? {
            lowest = lowest.min(self.root(branch)?.own_lowest_depth());
        }
        Ok(lowest)
    }

    /// Number of descendants of a branch, excluding itself.
    pub fn child_count(&self, id: RootId) -> Result<usize, GrowthError> {
        Ok(self.subtree(id)?.len() - 1)
    }
}
