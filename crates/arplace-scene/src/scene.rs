use crate::plane::{AlignmentFilter, PlaneId, PlaneSet};
use arplace_assets::Renderable;
use glam::{Affine3A, Mat4};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnchorId(u64);

impl AnchorId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A fixed pose in the tracked world that placed content hangs off.
///
/// An anchor aimed at a plane stays unresolved until a plane matching its
/// filter exists, then it is pinned to that plane's pose for good.
#[derive(Clone, Debug)]
pub struct Anchor {
    id: AnchorId,
    target: AlignmentFilter,
    plane: Option<PlaneId>,
    pose: Option<Affine3A>,
    children: Vec<Renderable>,
}

impl Anchor {
    pub fn on_plane(target: AlignmentFilter) -> Self {
        Self {
            id: AnchorId(0),
            target,
            plane: None,
            pose: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Renderable) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> AnchorId {
        self.id
    }

    pub fn plane(&self) -> Option<PlaneId> {
        self.plane
    }

    pub fn pose(&self) -> Option<Affine3A> {
        self.pose
    }

    pub fn is_resolved(&self) -> bool {
        self.pose.is_some()
    }

    pub fn children(&self) -> &[Renderable] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Renderable] {
        &mut self.children
    }

    /// World transform of a child, once the anchor is pinned.
    pub fn child_world_transform(&self, index: usize) -> Option<Mat4> {
        let pose = self.pose?;
        let child = self.children.get(index)?;
        Some(Mat4::from(pose) * child.transform)
    }

    fn try_resolve(&mut self, planes: &PlaneSet) -> bool {
        if self.pose.is_some() {
            return false;
        }
        match planes.first_matching(self.target) {
            Some(plane) => {
                self.plane = Some(plane.id);
                self.pose = Some(plane.pose);
                true
            }
            None => false,
        }
    }
}

/// Anchors registered with the live scene. Anchors are only ever added.
#[derive(Debug, Default)]
pub struct Scene {
    anchors: Vec<Anchor>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_anchor(&mut self, mut anchor: Anchor, planes: &PlaneSet) -> AnchorId {
        self.next_id += 1;
        anchor.id = AnchorId(self.next_id);
        anchor.try_resolve(planes);
        let id = anchor.id;
        self.anchors.push(anchor);
        id
    }

    /// Pins every unresolved anchor that now has a matching plane.
    pub fn resolve_pending(&mut self, planes: &PlaneSet) -> usize {
        self.anchors
            .iter_mut()
            .map(|anchor| anchor.try_resolve(planes))
            .filter(|resolved| *resolved)
            .count()
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.iter_mut().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.anchors.iter().filter(|a| !a.is_resolved()).count()
    }
}
