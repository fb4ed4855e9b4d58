use glam::Affine3A;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    Initializing,
    Tracking,
}

/// Focus square previewing where a placement would land.
#[derive(Debug)]
pub struct PlacementIndicator {
    state: TrackingState,
    pose: Option<Affine3A>,
}

impl Default for PlacementIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementIndicator {
    pub fn new() -> Self {
        Self {
            state: TrackingState::Initializing,
            pose: None,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn pose(&self) -> Option<Affine3A> {
        self.pose
    }

    /// Feeds the latest centre hit. Returns the new state on a transition.
    pub fn update(&mut self, hit: Option<Affine3A>) -> Option<TrackingState> {
        self.pose = hit;
        let next = if hit.is_some() {
            TrackingState::Tracking
        } else {
            TrackingState::Initializing
        };
        if next == self.state {
            return None;
        }

        self.state = next;
        match next {
            TrackingState::Tracking => log::info!("indicator tracking a surface"),
            TrackingState::Initializing => log::info!("indicator initializing"),
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_transitions() {
        let mut indicator = PlacementIndicator::new();
        assert_eq!(indicator.update(None), None);

        let hit = Affine3A::IDENTITY;
        assert_eq!(indicator.update(Some(hit)), Some(TrackingState::Tracking));
        assert_eq!(indicator.update(Some(hit)), None);
        assert_eq!(indicator.pose(), Some(hit));

        assert_eq!(indicator.update(None), Some(TrackingState::Initializing));
        assert!(indicator.pose().is_none());
    }
}
