use std::collections::{BTreeMap, VecDeque};

use crate::descriptor::{FrameSnapshot, GeometryDescriptor};
use crate::geometry::{Point, Rect, Size};
use crate::monitor::WindowEvent;
use crate::scene::SceneId;
use crate::window::{WindowHandle, WindowIdentifier, WindowingLayer};

/// Size the simulated OS gives a window nobody has placed yet.
pub const DEFAULT_WINDOW_SIZE: Size = Size {
    width: 480.0,
    height: 320.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub frame: Rect,
    /// Area not covered by menu bars or docks.
    pub visible: Rect,
}

impl Screen {
    pub fn new(frame: Rect, visible: Rect) -> Self {
        Self { frame, visible }
    }

    pub fn full(frame: Rect) -> Self {
        Self::new(frame, frame)
    }
}

#[derive(Debug, Clone)]
struct HeadlessWindow {
    identifier: Option<WindowIdentifier>,
    frame: Rect,
    screen: Option<usize>,
    visible: bool,
    closing: bool,
}

/// In-memory desktop: screens, windows, stacking order and a queue of the
/// events a real toolkit would deliver.
#[derive(Debug, Default)]
pub struct HeadlessDesktop {
    screens: Vec<Screen>,
    windows: BTreeMap<WindowHandle, HeadlessWindow>,
    // back to front
    z_order: Vec<WindowHandle>,
    events: VecDeque<(WindowHandle, WindowEvent)>,
    instances: BTreeMap<SceneId, u32>,
    next_handle: u64,
}

impl HeadlessDesktop {
    pub fn new(screens: Vec<Screen>) -> Self {
        Self {
            screens,
            next_handle: 1,
            ..Self::default()
        }
    }

    pub fn with_screen(frame: Rect) -> Self {
        Self::new(vec![Screen::full(frame)])
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    /// Creates a window on the first screen, centered in its visible area,
    /// and queues [`WindowEvent::Connected`].
    pub fn create_window(&mut self, scene: Option<&SceneId>) -> WindowHandle {
        let screen = (!self.screens.is_empty()).then_some(0);
        self.spawn(scene, screen)
    }

    /// Creates a window that is not attached to any screen yet.
    pub fn create_detached_window(&mut self, scene: Option<&SceneId>) -> WindowHandle {
        self.spawn(scene, None)
    }

    fn spawn(&mut self, scene: Option<&SceneId>, screen: Option<usize>) -> WindowHandle {
        let handle = WindowHandle::from_raw(self.next_handle.max(1));
        self.next_handle = handle.raw() + 1;

        let identifier = scene.map(|scene| {
            let instance = self.instances.entry(scene.clone()).or_insert(0);
            *instance += 1;
            WindowIdentifier::new(scene.clone(), *instance)
        });
        let origin = match screen.and_then(|i| self.screens.get(i)) {
            Some(screen) => Point::new(
                screen.visible.min_x() + (screen.visible.width() - DEFAULT_WINDOW_SIZE.width) / 2.0,
                screen.visible.min_y()
                    + (screen.visible.height() - DEFAULT_WINDOW_SIZE.height) / 2.0,
            ),
            None => Point::ZERO,
        };
        tracing::trace!(%handle, ?identifier, "created headless window");
        self.windows.insert(
            handle,
            HeadlessWindow {
                identifier,
                frame: Rect::from_parts(origin, DEFAULT_WINDOW_SIZE),
                screen,
                visible: false,
                closing: false,
            },
        );
        self.z_order.push(handle);
        self.events.push_back((handle, WindowEvent::Connected));
        handle
    }

    pub fn show(&mut self, window: WindowHandle) -> bool {
        let Some(w) = self.live_mut(window) else {
            return false;
        };
        if w.visible {
            return true;
        }
        w.visible = true;
        self.events
            .push_back((window, WindowEvent::VisibilityChanged(true)));
        self.raise(window);
        true
    }

    pub fn hide(&mut self, window: WindowHandle) -> bool {
        let Some(w) = self.live_mut(window) else {
            return false;
        };
        if w.visible {
            w.visible = false;
            self.events
                .push_back((window, WindowEvent::VisibilityChanged(false)));
        }
        true
    }

    /// Starts closing a window. It stays readable until [`Self::reap_closed`]
    /// so will-close handlers can still capture its frame.
    pub fn close(&mut self, window: WindowHandle) -> bool {
        let Some(w) = self.live_mut(window) else {
            return false;
        };
        w.closing = true;
        w.visible = false;
        self.events.push_back((window, WindowEvent::WillClose));
        true
    }

    /// Destroys windows whose close has been delivered.
    pub fn reap_closed(&mut self) -> Vec<WindowHandle> {
        let pending = self
            .events
            .iter()
            .map(|(handle, _)| *handle)
            .collect::<Vec<_>>();
        let closed = self
            .windows
            .iter()
            .filter(|(handle, w)| w.closing && !pending.contains(handle))
            .map(|(handle, _)| *handle)
            .collect::<Vec<_>>();
        for handle in &closed {
            self.windows.remove(handle);
            self.z_order.retain(|w| w != handle);
        }
        closed
    }

    pub fn poll_event(&mut self) -> Option<(WindowHandle, WindowEvent)> {
        self.events.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn front_window(&self) -> Option<WindowHandle> {
        self.z_order.last().copied()
    }

    pub fn identifier(&self, window: WindowHandle) -> Option<&WindowIdentifier> {
        self.windows.get(&window)?.identifier.as_ref()
    }

    pub fn is_visible(&self, window: WindowHandle) -> bool {
        self.windows.get(&window).is_some_and(|w| w.visible)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn live_mut(&mut self, window: WindowHandle) -> Option<&mut HeadlessWindow> {
        self.windows.get_mut(&window).filter(|w| !w.closing)
    }

    fn raise(&mut self, window: WindowHandle) {
        self.z_order.retain(|w| *w != window);
        self.z_order.push(window);
    }

    fn screen_containing(&self, point: Point) -> Option<usize> {
        self.screens
            .iter()
            .position(|screen| screen.frame.contains_point(point))
    }

    fn move_to(&mut self, window: WindowHandle, frame: Rect) -> bool {
        let center = Point::new(
            frame.min_x() + frame.width() / 2.0,
            frame.min_y() + frame.height() / 2.0,
        );
        let screen = self.screen_containing(center);
        let Some(w) = self.windows.get_mut(&window) else {
            return false;
        };
        w.frame = frame;
        if screen.is_some() {
            w.screen = screen;
        }
        self.events.push_back((window, WindowEvent::FrameChanged(frame)));
        true
    }
}

/// Shrinks and shifts `frame` until it fits inside `visible`.
fn constrain(frame: Rect, visible: Rect) -> Rect {
    let width = frame.width().min(visible.width());
    let height = frame.height().min(visible.height());
    let x = frame
        .min_x()
        .min(visible.max_x() - width)
        .max(visible.min_x());
    let y = frame
        .min_y()
        .min(visible.max_y() - height)
        .max(visible.min_y());
    Rect::new(x, y, width, height)
}

impl WindowingLayer for HeadlessDesktop {
    fn is_alive(&self, window: WindowHandle) -> bool {
        self.windows.contains_key(&window)
    }

    fn frame(&self, window: WindowHandle) -> Option<Rect> {
        self.windows.get(&window).map(|w| w.frame)
    }

    fn visible_screen_frame(&self, window: WindowHandle) -> Option<Rect> {
        let index = self.windows.get(&window)?.screen?;
        self.screens.get(index).map(|screen| screen.visible)
    }

    fn set_frame(&mut self, window: WindowHandle, frame: Rect) -> bool {
        self.move_to(window, frame)
    }

    fn set_frame_from_descriptor(
        &mut self,
        window: WindowHandle,
        descriptor: &GeometryDescriptor,
    ) -> bool {
        let snapshot = match FrameSnapshot::parse(descriptor) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%window, %descriptor, error = %err, "cannot restore frame");
                return false;
            }
        };
        let Some(current) = self.windows.get(&window) else {
            return false;
        };
        // prefer the screen the frame was saved on, if it is still around
        let center = Point::new(
            snapshot.frame.min_x() + snapshot.frame.width() / 2.0,
            snapshot.frame.min_y() + snapshot.frame.height() / 2.0,
        );
        let screen = self
            .screens
            .iter()
            .position(|s| s.visible == snapshot.screen)
            .or_else(|| self.screen_containing(center))
            .or(current.screen);
        let frame = match screen.and_then(|i| self.screens.get(i)) {
            Some(screen) => constrain(snapshot.frame, screen.visible),
            None => snapshot.frame,
        };
        self.move_to(window, frame)
    }

    fn frame_descriptor(&self, window: WindowHandle) -> Option<GeometryDescriptor> {
        let w = self.windows.get(&window)?;
        let screen = w
            .screen
            .and_then(|i| self.screens.get(i))
            .map(|screen| screen.visible)
            .unwrap_or_default();
        Some(FrameSnapshot::new(w.frame, screen).to_descriptor())
    }

    fn bring_to_front(&mut self, window: WindowHandle) -> bool {
        if self.live_mut(window).is_none() {
            return false;
        }
        self.raise(window);
        self.events.push_back((window, WindowEvent::KeyChanged(true)));
        true
    }
}
