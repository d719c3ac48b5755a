use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Descriptor, EntityKind, TableView};

pub const EXPOSURE: &str = "Exposure";
pub const BRIGHTNESS: &str = "Brightness";
pub const WHITE_BALANCE: &str = "WhiteBalance";

/// Brightness / exposure / white-balance triple applied in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraPreset {
    pub brightness: i32,
    pub exposure: i32,
    pub white_balance: i32,
}

impl CameraPreset {
    pub fn new(brightness: i32, exposure: i32, white_balance: i32) -> Self {
        Self {
            brightness,
            exposure,
            white_balance,
        }
    }
}

/// A camera published under `<root>/Cameras/<name>`.
#[derive(Debug, Clone)]
pub struct Camera {
    view: TableView,
}

impl Camera {
    pub fn exposure(&self) -> i32 {
        self.view.int(EXPOSURE)
    }

    pub fn brightness(&self) -> i32 {
        self.view.int(BRIGHTNESS)
    }

    pub fn white_balance(&self) -> i32 {
        self.view.int(WHITE_BALANCE)
    }

    pub fn set_exposure(&self, value: i32) -> bool {
        self.view.set_int(EXPOSURE, value)
    }

    pub fn set_brightness(&self, value: i32) -> bool {
        self.view.set_int(BRIGHTNESS, value)
    }

    pub fn set_white_balance(&self, value: i32) -> bool {
        self.view.set_int(WHITE_BALANCE, value)
    }

    /// Writes brightness, then exposure, then white balance, stopping at
    /// the first rejected write.
    pub fn apply_preset(&self, preset: &CameraPreset) -> bool {
        self.set_brightness(preset.brightness)
            && self.set_exposure(preset.exposure)
            && self.set_white_balance(preset.white_balance)
    }
}

impl Descriptor for Camera {
    const KIND: EntityKind = EntityKind::Camera;

    fn from_view(view: TableView) -> Self {
        Self { view }
    }

    fn view(&self) -> &TableView {
        &self.view
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {{EX: {}, BR: {}, WB: {}}}",
            self.name(),
            self.exposure(),
            self.brightness(),
            self.white_balance()
        )
    }
}
