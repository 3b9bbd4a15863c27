use crate::activation::ActivationChannel;
use crate::manager::WindowManager;
use crate::monitor::{WindowEvent, WindowMonitor};
use crate::placement::Placement;
use crate::scene::SceneId;
use crate::store::SettingsStore;
use crate::window::{WindowHandle, WindowingLayer};

/// Window-related state handed to the content of one scene window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub window: Option<WindowHandle>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Closed,
}

/// Connection between one native window and the scene that created it.
///
/// Routes the window's events into the manager: connecting registers the
/// window, the first time it becomes visible it is placed, and closing
/// unregisters it and tears the monitor down.
#[derive(Debug)]
pub struct WindowSession {
    scene: SceneId,
    state: WindowState,
    monitor: WindowMonitor,
    placement: Option<Placement>,
}

impl WindowSession {
    pub fn new(scene: SceneId) -> Self {
        Self {
            scene,
            state: WindowState::default(),
            monitor: WindowMonitor::new(),
            placement: None,
        }
    }

    pub fn scene(&self) -> &SceneId {
        &self.scene
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    /// Placement applied when the window first became visible.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn monitor(&self) -> &WindowMonitor {
        &self.monitor
    }

    /// For app code that wants to observe further window attributes.
    pub fn monitor_mut(&mut self) -> &mut WindowMonitor {
        &mut self.monitor
    }

    pub fn is_closed(&self) -> bool {
        self.monitor.is_closed()
    }

    pub fn handle_event<L, S, A>(
        &mut self,
        window: WindowHandle,
        event: &WindowEvent,
        manager: &mut WindowManager<L, S, A>,
    ) -> SessionStatus
    where
        L: WindowingLayer,
        S: SettingsStore,
        A: ActivationChannel,
    {
        if self.monitor.is_closed() {
            return SessionStatus::Closed;
        }
        match event {
            WindowEvent::Connected => {
                if self.monitor.connect(window) {
                    self.state.window = Some(window);
                    manager.register_window(self.scene.as_str(), window);
                }
            }
            _ if self.state.window != Some(window) => {
                tracing::warn!(
                    scene_id = %self.scene,
                    %window,
                    bound = ?self.state.window,
                    "event for a window this session does not own"
                );
                return SessionStatus::Open;
            }
            WindowEvent::VisibilityChanged(visible) => {
                self.state.is_visible = *visible;
                if *visible && self.placement.is_none() {
                    self.placement = Some(manager.set_initial_frame(self.scene.as_str(), window));
                }
            }
            WindowEvent::WillClose => {
                manager.unregister_window(self.scene.as_str(), window);
                self.state = WindowState::default();
            }
            WindowEvent::FrameChanged(_) | WindowEvent::KeyChanged(_) => {}
        }
        self.monitor.notify(event);
        if self.monitor.is_closed() {
            SessionStatus::Closed
        } else {
            SessionStatus::Open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::QueueChannel;
    use crate::backend::headless::HeadlessDesktop;
    use crate::config::WindowManagerConfig;
    use crate::geometry::Rect;
    use crate::monitor::{ObserverFlow, WindowAttribute};
    use crate::store::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;

    fn manager() -> WindowManager<HeadlessDesktop, MemoryStore, QueueChannel> {
        WindowManager::new(
            WindowManagerConfig::default(),
            HeadlessDesktop::with_screen(Rect::new(0.0, 0.0, 1000.0, 800.0)),
            MemoryStore::new(),
            QueueChannel::new(),
        )
    }

    #[test]
    fn lifecycle_registers_places_and_unregisters() {
        let mut wm = manager();
        let main = wm.register_scene(Some("main"), None, false, "Main");
        let w = wm.layer_mut().create_window(Some(&main));
        let mut session = WindowSession::new(main.clone());

        assert_eq!(
            session.handle_event(w, &WindowEvent::Connected, &mut wm),
            SessionStatus::Open
        );
        assert_eq!(wm.windows("main"), [w]);
        assert_eq!(session.state().window, Some(w));

        session.handle_event(w, &WindowEvent::VisibilityChanged(true), &mut wm);
        assert_eq!(session.placement(), Some(&Placement::Unchanged));
        assert!(session.state().is_visible);

        assert_eq!(
            session.handle_event(w, &WindowEvent::WillClose, &mut wm),
            SessionStatus::Closed
        );
        assert!(wm.windows("main").is_empty());
        assert!(wm.frames().load("main").is_some());
        assert!(session.is_closed());
    }

    #[test]
    fn placement_runs_once_per_window() {
        let mut wm = manager();
        let main = wm.register_scene(Some("main"), None, false, "Main");
        let w = wm.layer_mut().create_window(Some(&main));
        let mut session = WindowSession::new(main);
        session.handle_event(w, &WindowEvent::Connected, &mut wm);
        session.handle_event(w, &WindowEvent::VisibilityChanged(true), &mut wm);
        wm.layer_mut().set_frame(w, Rect::new(5.0, 5.0, 100.0, 100.0));
        session.handle_event(w, &WindowEvent::VisibilityChanged(false), &mut wm);
        session.handle_event(w, &WindowEvent::VisibilityChanged(true), &mut wm);
        assert_eq!(wm.layer().frame(w), Some(Rect::new(5.0, 5.0, 100.0, 100.0)));
    }

    #[test]
    fn app_observers_see_events_until_close() {
        let mut wm = manager();
        let main = wm.register_scene(Some("main"), None, false, "Main");
        let w = wm.layer_mut().create_window(Some(&main));
        let mut session = WindowSession::new(main);
        session.handle_event(w, &WindowEvent::Connected, &mut wm);

        let shown = Rc::new(Cell::new(0));
        let counter = Rc::clone(&shown);
        session
            .monitor_mut()
            .observe(WindowAttribute::Visible, move |_, _| {
                counter.set(counter.get() + 1);
                ObserverFlow::Continue
            });
        session.handle_event(w, &WindowEvent::VisibilityChanged(true), &mut wm);
        session.handle_event(w, &WindowEvent::WillClose, &mut wm);
        session.handle_event(w, &WindowEvent::VisibilityChanged(true), &mut wm);
        assert_eq!(shown.get(), 1);
        assert_eq!(session.monitor().subscription_count(), 0);
    }

    #[test]
    fn foreign_window_events_are_ignored() {
        let mut wm = manager();
        let main = wm.register_scene(Some("main"), None, false, "Main");
        let w = wm.layer_mut().create_window(Some(&main));
        let stranger = wm.layer_mut().create_window(None);
        let mut session = WindowSession::new(main);
        session.handle_event(w, &WindowEvent::Connected, &mut wm);
        assert_eq!(
            session.handle_event(stranger, &WindowEvent::WillClose, &mut wm),
            SessionStatus::Open
        );
        assert_eq!(wm.windows("main"), [w]);
    }
}
