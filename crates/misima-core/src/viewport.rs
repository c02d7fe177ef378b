//! Responsive layout classes, decoupled from how the viewport width is
//! discovered.

use serde::Serialize;

const TABLET_MIN_PX: u32 = 768;
const LAPTOP_MIN_PX: u32 = 1280;
const DESKTOP_MIN_PX: u32 = 1400;

/// Supplies the client's viewport width in CSS pixels, when known.
pub trait ViewportSource {
    fn viewport_width(&self) -> Option<u32>;

    fn viewport_class(&self) -> ViewportClass {
        self.viewport_width()
            .map_or(ViewportClass::Desktop, ViewportClass::from_width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Laptop,
    Desktop,
}

impl ViewportClass {
    #[must_use]
    pub fn from_width(width_px: u32) -> Self {
        match width_px {
            w if w >= DESKTOP_MIN_PX => ViewportClass::Desktop,
            w if w >= LAPTOP_MIN_PX => ViewportClass::Laptop,
            w if w >= TABLET_MIN_PX => ViewportClass::Tablet,
            _ => ViewportClass::Mobile,
        }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        self == ViewportClass::Mobile
    }

    /// Initial hero logo width in pixels before scroll scaling.
    #[must_use]
    pub fn hero_logo_scale(self) -> u32 {
        match self {
            ViewportClass::Mobile => 250,
            ViewportClass::Tablet | ViewportClass::Laptop => 500,
            ViewportClass::Desktop => 720,
        }
    }

    #[must_use]
    pub fn quantity_label(self) -> &'static str {
        if self.is_mobile() {
            "Qty:"
        } else {
            "Quantity:"
        }
    }
}

impl ViewportSource for Option<u32> {
    fn viewport_width(&self) -> Option<u32> {
        *self
    }
}
