use glam::{Affine3A, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaneId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneAlignment {
    Horizontal,
    Vertical,
}

/// Which detected planes an anchor or raycast may use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlignmentFilter {
    #[default]
    Any,
    Horizontal,
    Vertical,
}

impl AlignmentFilter {
    pub fn accepts(self, alignment: PlaneAlignment) -> bool {
        match self {
            AlignmentFilter::Any => true,
            AlignmentFilter::Horizontal => alignment == PlaneAlignment::Horizontal,
            AlignmentFilter::Vertical => alignment == PlaneAlignment::Vertical,
        }
    }
}

/// A flat real-world surface reported by the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedPlane {
    pub id: PlaneId,
    pub alignment: PlaneAlignment,
    /// Plane centre in world space; local +Y is the surface normal.
    pub pose: Affine3A,
    pub extent: Vec2,
}

/// Detected planes in the order the session first reported them.
#[derive(Debug, Default)]
pub struct PlaneSet {
    planes: Vec<DetectedPlane>,
}

impl PlaneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes a plane. Refreshing keeps its detection order.
    /// Returns `true` for a newly seen plane.
    pub fn upsert(&mut self, plane: DetectedPlane) -> bool {
        match self.planes.iter_mut().find(|p| p.id == plane.id) {
            Some(existing) => {
                *existing = plane;
                false
            }
            None => {
                self.planes.push(plane);
                true
            }
        }
    }

    pub fn remove(&mut self, id: PlaneId) -> Option<DetectedPlane> {
        let index = self.planes.iter().position(|p| p.id == id)?;
        Some(self.planes.remove(index))
    }

    pub fn get(&self, id: PlaneId) -> Option<&DetectedPlane> {
        self.planes.iter().find(|p| p.id == id)
    }

    /// First plane in detection order that `filter` accepts; no ranking.
    pub fn first_matching(&self, filter: AlignmentFilter) -> Option<&DetectedPlane> {
        self.planes.iter().find(|p| filter.accepts(p.alignment))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectedPlane> {
        self.planes.iter()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}
