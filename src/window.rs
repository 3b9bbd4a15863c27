//! Native window handles and the outbound windowing-layer interface.

use std::fmt;
use std::str::FromStr;

use crate::descriptor::GeometryDescriptor;
use crate::geometry::Rect;
use crate::scene::SceneId;

/// Non-owning reference to a native window.
///
/// The windowing layer owns the window; a handle may go stale at any time,
/// so every [`WindowingLayer`] call re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier the windowing layer gives windows it creates for a scene:
/// `"<scene>-AppWindow-<instance>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowIdentifier {
    pub scene: SceneId,
    pub instance: u32,
}

impl WindowIdentifier {
    const MARKER: &'static str = "AppWindow";

    pub fn new(scene: SceneId, instance: u32) -> Self {
        Self { scene, instance }
    }
}

impl fmt::Display for WindowIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.scene, Self::MARKER, self.instance)
    }
}

impl FromStr for WindowIdentifier {
    type Err = ();

    /// Splits on the last `-AppWindow-` so scene ids may contain dashes
    /// (`"x-1-AppWindow-2"` is instance 2 of scene `x-1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let marker = format!("-{}-", Self::MARKER);
        let (scene, instance) = s.rsplit_once(&marker).ok_or(())?;
        if scene.is_empty() {
            return Err(());
        }
        let instance = instance.parse::<u32>().map_err(|_| ())?;
        Ok(Self::new(SceneId::from(scene), instance))
    }
}

/// Operations the manager needs from the OS windowing layer.
///
/// Every method takes a possibly-stale handle: lookups return `None` and
/// mutations return `false` when the window no longer exists.
pub trait WindowingLayer {
    fn is_alive(&self, window: WindowHandle) -> bool;

    fn frame(&self, window: WindowHandle) -> Option<Rect>;

    /// Visible area of the screen the window is on, or `None` when the
    /// window is not attached to a screen yet.
    fn visible_screen_frame(&self, window: WindowHandle) -> Option<Rect>;

    fn set_frame(&mut self, window: WindowHandle, frame: Rect) -> bool;

    /// Restores a frame previously produced by [`Self::frame_descriptor`].
    fn set_frame_from_descriptor(
        &mut self,
        window: WindowHandle,
        descriptor: &GeometryDescriptor,
    ) -> bool;

    fn frame_descriptor(&self, window: WindowHandle) -> Option<GeometryDescriptor>;

    fn bring_to_front(&mut self, window: WindowHandle) -> bool;
}

impl<T: WindowingLayer + ?Sized> WindowingLayer for &mut T {
    fn is_alive(&self, window: WindowHandle) -> bool {
        (**self).is_alive(window)
    }

    fn frame(&self, window: WindowHandle) -> Option<Rect> {
        (**self).frame(window)
    }

    fn visible_screen_frame(&self, window: WindowHandle) -> Option<Rect> {
        (**self).visible_screen_frame(window)
    }

    fn set_frame(&mut self, window: WindowHandle, frame: Rect) -> bool {
        (**self).set_frame(window, frame)
    }

    fn set_frame_from_descriptor(
        &mut self,
        window: WindowHandle,
        descriptor: &GeometryDescriptor,
    ) -> bool {
        (**self).set_frame_from_descriptor(window, descriptor)
    }

    fn frame_descriptor(&self, window: WindowHandle) -> Option<GeometryDescriptor> {
        (**self).frame_descriptor(window)
    }

    fn bring_to_front(&mut self, window: WindowHandle) -> bool {
        (**self).bring_to_front(window)
    }
}
