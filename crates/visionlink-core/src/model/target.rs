use std::time::Duration;

use serde::Serialize;

use super::{Descriptor, EntityKind, TableView};

pub const X: &str = "x";
pub const Y: &str = "y";
pub const Z: &str = "z";
pub const DISTANCE: &str = "distance";
pub const UP_DOWN: &str = "up-down";
pub const LEFT_RIGHT: &str = "left-right";

const ALL_KEYS: [&str; 6] = [X, Y, Z, DISTANCE, UP_DOWN, LEFT_RIGHT];

/// Position of a target relative to the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Every attribute of a target, read at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetData {
    pub offset: TargetOffset,
    pub distance: f64,
    pub up_down: f64,
    pub left_right: f64,
}

/// A target published under `/Targets/<name>`.
#[derive(Debug, Clone)]
pub struct Target {
    view: TableView,
}

impl Target {
    pub fn offset(&self) -> TargetOffset {
        TargetOffset {
            x: self.view.double(X),
            y: self.view.double(Y),
            z: self.view.double(Z),
        }
    }

    pub fn distance(&self) -> f64 {
        self.view.double(DISTANCE)
    }

    /// Vertical angle.
    pub fn up_down(&self) -> f64 {
        self.view.double(UP_DOWN)
    }

    /// Horizontal angle.
    pub fn left_right(&self) -> f64 {
        self.view.double(LEFT_RIGHT)
    }

    pub fn data(&self) -> TargetData {
        TargetData {
            offset: self.offset(),
            distance: self.distance(),
            up_down: self.up_down(),
            left_right: self.left_right(),
        }
    }

    /// Age of the most recently written attribute, `None` if none exist.
    pub fn last_update_age(&self) -> Option<Duration> {
        ALL_KEYS
            .iter()
            .filter_map(|key| self.view.last_write_age(key))
            .min()
    }

    pub fn is_updated_within(&self, threshold: Duration) -> bool {
        self.last_update_age().is_some_and(|age| age <= threshold)
    }
}

impl Descriptor for Target {
    const KIND: EntityKind = EntityKind::Target;

    fn from_view(view: TableView) -> Self {
        Self { view }
    }

    fn view(&self) -> &TableView {
        &self.view
    }
}
