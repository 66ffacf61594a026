//! Page settings, built explicitly or from `NODELIST_*` environment variables.

use core::str::FromStr;
use core::time::Duration;
use std::env;

use css_values_units::Viewport;
use html::Environment;
use log::warn;

/// How `float` is spelled as a style accessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleFlavor {
    /// `cssFloat`
    #[default]
    Standard,
    /// `styleFloat`, as older engines expose it.
    Legacy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub viewport: Viewport,
    pub root_font_size_px: f32,
    /// Time one call to `Page::tick` advances animations by.
    pub frame_interval: Duration,
    pub style_flavor: StyleFlavor,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new(
            Viewport {
                width_px: 1024,
                height_px: 768,
            },
            16.0,
            16,
        )
    }
}

impl PageConfig {
    /// A frame interval below one millisecond is raised to one.
    #[must_use]
    pub fn new(viewport: Viewport, root_font_size_px: f32, frame_ms: u64) -> Self {
        Self {
            viewport,
            root_font_size_px,
            frame_interval: Duration::from_millis(frame_ms.max(1)),
            style_flavor: StyleFlavor::Standard,
        }
    }

    #[must_use]
    pub const fn with_style_flavor(mut self, flavor: StyleFlavor) -> Self {
        self.style_flavor = flavor;
        self
    }

    /// Load from the environment:
    /// - `NODELIST_VIEWPORT_WIDTH` / `NODELIST_VIEWPORT_HEIGHT` (default 1024x768)
    /// - `NODELIST_ROOT_FONT_SIZE` in px (default 16)
    /// - `NODELIST_FRAME_MS` (default 16)
    /// - `NODELIST_LEGACY_FLOAT=1` selects `styleFloat`
    ///
    /// Unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let width_px = read_var("NODELIST_VIEWPORT_WIDTH").unwrap_or(defaults.viewport.width_px);
        let height_px = read_var("NODELIST_VIEWPORT_HEIGHT").unwrap_or(defaults.viewport.height_px);
        let root_font_size_px = read_var::<f32>("NODELIST_ROOT_FONT_SIZE")
            .filter(|size| *size > 0.0)
            .unwrap_or(defaults.root_font_size_px);
        let frame_ms = read_var("NODELIST_FRAME_MS").unwrap_or(16);
        let flavor = if env::var("NODELIST_LEGACY_FLOAT").ok().as_deref() == Some("1") {
            StyleFlavor::Legacy
        } else {
            StyleFlavor::Standard
        };
        Self::new(
            Viewport {
                width_px,
                height_px,
            },
            root_font_size_px,
            frame_ms,
        )
        .with_style_flavor(flavor)
    }

    /// The document environment these settings describe.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        Environment {
            viewport: self.viewport,
            root_font_size_px: self.root_font_size_px,
        }
    }
}

fn read_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(target: "nodelist::config", "ignoring {name}={raw:?}");
    }
    parsed
}
