//! Viewport width from client-hint request headers.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use misima_core::{ViewportClass, ViewportSource};
use serde::Serialize;

const VIEWPORT_HINT_HEADERS: [&str; 2] = ["sec-ch-viewport-width", "viewport-width"];

/// Viewport width as reported by `Sec-CH-Viewport-Width` (preferred) or the
/// legacy `Viewport-Width` hint. Browsers that send neither are treated as
/// desktop.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ClientHints {
    width: Option<u32>,
}

impl ClientHints {
    fn from_headers(headers: &HeaderMap) -> Self {
        let width = VIEWPORT_HINT_HEADERS.iter().find_map(|name| {
            let raw = headers.get(*name)?.to_str().ok()?.trim();
            // Hints may carry fractional pixels ("412.5").
            let px = raw.split('.').next()?.parse::<u32>().ok()?;
            (px > 0).then_some(px)
        });
        Self { width }
    }
}

impl ViewportSource for ClientHints {
    fn viewport_width(&self) -> Option<u32> {
        self.width
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientHints {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ViewportData {
    class: ViewportClass,
    is_mobile: bool,
    hero_logo_scale: u32,
    quantity_label: &'static str,
}

impl ViewportData {
    pub(super) fn of(source: &impl ViewportSource) -> Self {
        let class = source.viewport_class();
        Self {
            class,
            is_mobile: class.is_mobile(),
            hero_logo_scale: class.hero_logo_scale(),
            quantity_label: class.quantity_label(),
        }
    }
}
