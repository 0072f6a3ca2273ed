//! Live capture backed by the `xcap` crate.
//!
//! Only compiled when the `screen` feature is enabled, so the rest of
//! the crate stays buildable on headless machines. The locator and
//! frame source here are the production counterparts of
//! [`FixedLocator`](super::FixedLocator) and
//! [`ScriptedScreen`](super::ScriptedScreen).

use super::{CaptureError, Frame, FrameSource, ScreenRegion, WindowError, WindowLocator};
use xcap::{Monitor, Window};

/// Locator that queries the window manager through `xcap`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapLocator;

impl XcapLocator {
    /// Creates a locator.
    pub fn new() -> Self {
        Self
    }
}

impl WindowLocator for XcapLocator {
    fn locate(&self, title_substring: &str) -> Result<ScreenRegion, WindowError> {
        let windows = Window::all()
            .map_err(|e| WindowError::EnumerationFailed(e.to_string()))?;

        for window in windows {
            if window.is_minimized().unwrap_or(false) {
                continue;
            }
            let Ok(title) = window.title() else {
                continue;
            };
            if !title.contains(title_substring) {
                continue;
            }

            let region = window_region(&window)
                .map_err(|e| WindowError::EnumerationFailed(e.to_string()))?;
            tracing::info!(%title, %region, "Located game window");
            return Ok(region);
        }

        Err(WindowError::NotFound(title_substring.to_string()))
    }
}

/// Lists all visible titled windows with their screen rectangles.
///
/// Backs the `--list-windows` flag so a title substring can be picked
/// without guessing.
pub fn list_windows() -> Result<Vec<(String, ScreenRegion)>, WindowError> {
    let windows =
        Window::all().map_err(|e| WindowError::EnumerationFailed(e.to_string()))?;

    let mut entries = Vec::new();
    for window in windows {
        if window.is_minimized().unwrap_or(false) {
            continue;
        }
        let Ok(title) = window.title() else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        if let Ok(region) = window_region(&window) {
            entries.push((title, region));
        }
    }
    Ok(entries)
}

fn window_region(window: &Window) -> Result<ScreenRegion, xcap::XCapError> {
    Ok(ScreenRegion::new(
        window.x()?,
        window.y()?,
        window.width()?,
        window.height()?,
    ))
}

/// Frame source that grabs the primary monitor and crops to the game
/// region.
///
/// Capturing the whole monitor and cropping keeps the grab valid even
/// while the game repaints, at the cost of copying more pixels than
/// the board needs.
pub struct XcapScreen {
    monitor: Monitor,
    crop_x: u32,
    crop_y: u32,
    region: ScreenRegion,
    sequence: u64,
}

impl XcapScreen {
    /// Opens the primary monitor and validates that `region` lies
    /// within it.
    pub fn new(region: ScreenRegion) -> Result<Self, CaptureError> {
        let monitor = primary_monitor()?;

        let monitor_x = monitor.x().unwrap_or(0);
        let monitor_y = monitor.y().unwrap_or(0);
        let monitor_w = monitor.width().unwrap_or(0);
        let monitor_h = monitor.height().unwrap_or(0);

        let crop_x = region.x - monitor_x;
        let crop_y = region.y - monitor_y;
        let fits = crop_x >= 0
            && crop_y >= 0
            && crop_x as u32 + region.width <= monitor_w
            && crop_y as u32 + region.height <= monitor_h;
        if !region.is_non_empty() || !fits {
            return Err(CaptureError::RegionOutOfBounds {
                region,
                width: monitor_w,
                height: monitor_h,
            });
        }

        tracing::debug!(
            %region,
            monitor_width = monitor_w,
            monitor_height = monitor_h,
            "Screen capture initialized"
        );

        Ok(Self {
            monitor,
            crop_x: crop_x as u32,
            crop_y: crop_y as u32,
            region,
            sequence: 0,
        })
    }

    /// Returns the region this source crops to.
    pub fn region(&self) -> ScreenRegion {
        self.region
    }
}

impl FrameSource for XcapScreen {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        if self.crop_x + self.region.width > image.width()
            || self.crop_y + self.region.height > image.height()
        {
            return Err(CaptureError::RegionOutOfBounds {
                region: self.region,
                width: image.width(),
                height: image.height(),
            });
        }

        let cropped = image::imageops::crop_imm(
            &image,
            self.crop_x,
            self.crop_y,
            self.region.width,
            self.region.height,
        )
        .to_image();

        self.sequence += 1;
        Ok(Frame::from_rgba(&cropped, self.sequence))
    }
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all()
        .map_err(|e| CaptureError::CaptureFailed(format!("monitor enumeration failed: {e}")))?;

    if monitors.is_empty() {
        return Err(CaptureError::CaptureFailed("no monitors found".to_string()));
    }

    monitors
        .into_iter()
        .find(|monitor| monitor.is_primary().unwrap_or(false))
        .ok_or_else(|| CaptureError::CaptureFailed("no primary monitor".to_string()))
}
