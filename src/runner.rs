use std::collections::BTreeMap;

use crate::activation::{self, ActivationResult, QueueChannel};
use crate::backend::headless::HeadlessDesktop;
use crate::error::ActivationError;
use crate::manager::{OpenOutcome, WindowManager};
use crate::scene::SceneId;
use crate::session::{SessionStatus, WindowSession};
use crate::store::SettingsStore;
use crate::window::WindowHandle;

pub type HeadlessManager<S> = WindowManager<HeadlessDesktop, S, QueueChannel>;

/// What one [`SceneRunner::pump`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub created: Vec<WindowHandle>,
    pub closed: Vec<WindowHandle>,
    pub activated: usize,
    pub events: usize,
}

/// Drives a [`WindowManager`] on the headless desktop the way an app's main
/// loop would: activation requests turn into new windows, window events are
/// routed to the session that owns the window.
pub struct SceneRunner<S> {
    manager: HeadlessManager<S>,
    sessions: BTreeMap<WindowHandle, WindowSession>,
}

impl<S: SettingsStore> SceneRunner<S> {
    pub fn new(manager: HeadlessManager<S>) -> Self {
        Self {
            manager,
            sessions: BTreeMap::new(),
        }
    }

    pub fn manager(&self) -> &HeadlessManager<S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut HeadlessManager<S> {
        &mut self.manager
    }

    pub fn session(&self, window: WindowHandle) -> Option<&WindowSession> {
        self.sessions.get(&window)
    }

    pub fn session_mut(&mut self, window: WindowHandle) -> Option<&mut WindowSession> {
        self.sessions.get_mut(&window)
    }

    pub fn open(&mut self, scene: &str) -> Result<OpenOutcome, ActivationError> {
        self.manager.open_window(scene)
    }

    /// Asks the desktop to close `window`; takes effect on the next pump.
    pub fn close(&mut self, window: WindowHandle) -> bool {
        self.manager.layer_mut().close(window)
    }

    /// Processes activation requests and window events until both queues
    /// are empty.
    ///
    /// Each request is followed by a full drain of window events so a
    /// second request for a single-window scene sees the window created by
    /// the first.
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        loop {
            self.drain_window_events(&mut report);
            let Some(url) = self.manager.channel_mut().pop() else {
                break;
            };
            match self.manager.handle_external_activation(&url) {
                ActivationResult::Handled => report.activated += 1,
                ActivationResult::PassThrough => {
                    match activation::scene_from_url(&url, self.manager.config().scheme()) {
                        Ok(scene) if self.manager.registry().contains(scene.as_str()) => {
                            report.created.push(self.spawn(scene));
                        }
                        Ok(scene) => {
                            tracing::warn!(scene_id = %scene, "activation for unknown scene");
                        }
                        Err(err) => tracing::warn!(%url, error = %err, "dropping activation"),
                    }
                }
            }
        }
        report
    }

    fn spawn(&mut self, scene: SceneId) -> WindowHandle {
        let window = self.manager.layer_mut().create_window(Some(&scene));
        self.sessions.insert(window, WindowSession::new(scene));
        // connect is queued first, so the window is tracked before it shows
        self.manager.layer_mut().show(window);
        window
    }

    fn drain_window_events(&mut self, report: &mut PumpReport) {
        while let Some((window, event)) = self.manager.layer_mut().poll_event() {
            report.events += 1;
            let Some(session) = self.sessions.get_mut(&window) else {
                tracing::trace!(%window, ?event, "event for unmanaged window");
                continue;
            };
            if session.handle_event(window, &event, &mut self.manager) == SessionStatus::Closed {
                self.sessions.remove(&window);
                report.closed.push(window);
            }
        }
        self.manager.layer_mut().reap_closed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationChannel;
    use crate::config::WindowManagerConfig;
    use crate::geometry::{Rect, UnitPoint};
    use crate::store::MemoryStore;
    use crate::window::WindowingLayer;

    fn runner() -> SceneRunner<MemoryStore> {
        SceneRunner::new(WindowManager::new(
            WindowManagerConfig::default(),
            HeadlessDesktop::with_screen(Rect::new(0.0, 0.0, 1000.0, 800.0)),
            MemoryStore::new(),
            QueueChannel::new(),
        ))
    }

    #[test]
    fn open_then_pump_creates_and_places_window() {
        let mut r = runner();
        r.manager_mut().register_scene(Some("main"), None, false, "Main");
        r.manager_mut()
            .set_default_anchor("main", UnitPoint::BOTTOM_TRAILING);
        r.open("main").unwrap();
        let report = r.pump();
        assert_eq!(report.created.len(), 1);
        let w = report.created[0];
        assert_eq!(r.manager().windows("main"), [w]);
        assert_eq!(
            r.manager().layer().frame(w),
            Some(Rect::new(520.0, 0.0, 480.0, 320.0))
        );
        assert!(r.session(w).is_some());
    }

    #[test]
    fn queued_duplicate_requests_for_single_window_scene_activate() {
        let mut r = runner();
        r.manager_mut().register_scene(Some("main"), None, true, "Main");
        r.open("main").unwrap();
        r.open("main").unwrap();
        let report = r.pump();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.activated, 1);
        assert_eq!(r.manager().windows("main").len(), 1);
    }

    #[test]
    fn close_removes_session() {
        let mut r = runner();
        r.manager_mut().register_scene(Some("main"), None, false, "Main");
        r.open("main").unwrap();
        let w = r.pump().created[0];
        assert!(r.close(w));
        let report = r.pump();
        assert_eq!(report.closed, [w]);
        assert!(r.session(w).is_none());
        assert!(r.manager().windows("main").is_empty());
        assert_eq!(r.manager().layer().window_count(), 0);
    }

    #[test]
    fn scene_registered_with_empty_id_still_opens() {
        let mut r = runner();
        let id = r.manager_mut().register_scene(Some(""), None, false, "app::Palette");
        assert_eq!(id, "Palette");
        r.open(id.as_str()).unwrap();
        let report = r.pump();
        assert_eq!(report.created.len(), 1);
        assert_eq!(r.manager().windows("Palette"), report.created.as_slice());
    }

    #[test]
    fn activation_for_unknown_scene_is_dropped() {
        let mut r = runner();
        r.manager_mut().register_scene(Some("main"), None, false, "Main");
        let url = activation::activation_url("scenewm", "ghost").unwrap();
        r.manager_mut().channel_mut().dispatch(&url).unwrap();
        let report = r.pump();
        assert!(report.created.is_empty());
        assert_eq!(r.manager().layer().window_count(), 0);
    }
}
