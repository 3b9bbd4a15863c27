//! Per-window observation of lifecycle events and attribute changes.
//!
//! A [`WindowMonitor`] is bound to at most one native window. Observers
//! subscribe to a single [`WindowAttribute`] and are dropped either when
//! they ask to stop, when they are unsubscribed, or when the window closes.

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Rect;
use crate::window::WindowHandle;

/// Notification delivered by the windowing layer for one window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The window now exists and is bound to the component that created it.
    Connected,
    VisibilityChanged(bool),
    FrameChanged(Rect),
    KeyChanged(bool),
    WillClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowAttribute {
    Visible,
    Frame,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Flag(bool),
    Frame(Rect),
}

impl WindowEvent {
    pub fn attribute(&self) -> Option<(WindowAttribute, AttributeValue)> {
        match *self {
            WindowEvent::VisibilityChanged(v) => {
                Some((WindowAttribute::Visible, AttributeValue::Flag(v)))
            }
            WindowEvent::FrameChanged(frame) => {
                Some((WindowAttribute::Frame, AttributeValue::Frame(frame)))
            }
            WindowEvent::KeyChanged(v) => Some((WindowAttribute::Key, AttributeValue::Flag(v))),
            WindowEvent::Connected | WindowEvent::WillClose => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverFlow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(WindowHandle, &AttributeValue) -> ObserverFlow>;

struct Subscription {
    attribute: WindowAttribute,
    handler: Handler,
}

#[derive(Default)]
pub struct WindowMonitor {
    window: Option<WindowHandle>,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: u64,
    closed: bool,
}

impl fmt::Debug for WindowMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowMonitor")
            .field("window", &self.window)
            .field("subscriptions", &self.subscriptions.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl WindowMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the monitor to `window`. Only the first connection counts; a
    /// closed monitor never reconnects.
    pub fn connect(&mut self, window: WindowHandle) -> bool {
        if self.window.is_some() || self.closed {
            return false;
        }
        tracing::trace!(%window, "monitor connected");
        self.window = Some(window);
        true
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Calls `handler` with every new value of `attribute` until it returns
    /// [`ObserverFlow::Stop`] or the window closes.
    ///
    /// # Panics
    ///
    /// Panics if the monitor has no window yet.
    pub fn observe<F>(&mut self, attribute: WindowAttribute, handler: F) -> SubscriptionId
    where
        F: FnMut(WindowHandle, &AttributeValue) -> ObserverFlow + 'static,
    {
        if self.window.is_none() {
            tracing::error!(?attribute, "observer registered before window connected");
            panic!("cannot observe {attribute:?} without a connected window");
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                attribute,
                handler: Box::new(handler),
            },
        );
        id
    }

    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Fans an event out to the observers of its attribute. Closing
    /// dismantles the monitor.
    pub fn notify(&mut self, event: &WindowEvent) {
        let Some(window) = self.window else {
            return;
        };
        if matches!(event, WindowEvent::WillClose) {
            self.dismantle();
            return;
        }
        let Some((attribute, value)) = event.attribute() else {
            return;
        };
        self.subscriptions.retain(|_, sub| {
            sub.attribute != attribute || (sub.handler)(window, &value) == ObserverFlow::Continue
        });
    }

    /// Drops all observers and forgets the window.
    pub fn dismantle(&mut self) {
        tracing::trace!(window = ?self.window, "monitor dismantled");
        self.window = None;
        self.closed = true;
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const W: WindowHandle = WindowHandle::from_raw(7);

    #[test]
    fn only_first_connection_binds() {
        let mut monitor = WindowMonitor::new();
        assert!(monitor.connect(W));
        assert!(!monitor.connect(WindowHandle::from_raw(8)));
        assert_eq!(monitor.window(), Some(W));
    }

    #[test]
    fn observers_only_see_their_attribute() {
        let mut monitor = WindowMonitor::new();
        monitor.connect(W);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        monitor.observe(WindowAttribute::Visible, move |window, value| {
            sink.borrow_mut().push((window, *value));
            ObserverFlow::Continue
        });
        monitor.notify(&WindowEvent::FrameChanged(Rect::new(0.0, 0.0, 1.0, 1.0)));
        monitor.notify(&WindowEvent::VisibilityChanged(true));
        monitor.notify(&WindowEvent::VisibilityChanged(false));
        assert_eq!(
            *seen.borrow(),
            [(W, AttributeValue::Flag(true)), (W, AttributeValue::Flag(false))]
        );
    }

    #[test]
    fn stopping_observer_unsubscribes_itself() {
        let mut monitor = WindowMonitor::new();
        monitor.connect(W);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        monitor.observe(WindowAttribute::Visible, move |_, _| {
            *counter.borrow_mut() += 1;
            ObserverFlow::Stop
        });
        monitor.notify(&WindowEvent::VisibilityChanged(true));
        monitor.notify(&WindowEvent::VisibilityChanged(true));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(monitor.subscription_count(), 0);
    }

    #[test]
    fn unobserve_and_close_drop_subscriptions() {
        let mut monitor = WindowMonitor::new();
        monitor.connect(W);
        let a = monitor.observe(WindowAttribute::Key, |_, _| ObserverFlow::Continue);
        monitor.observe(WindowAttribute::Frame, |_, _| ObserverFlow::Continue);
        assert!(monitor.unobserve(a));
        assert!(!monitor.unobserve(a));
        assert_eq!(monitor.subscription_count(), 1);
        monitor.notify(&WindowEvent::WillClose);
        assert!(monitor.is_closed());
        assert_eq!(monitor.window(), None);
        assert_eq!(monitor.subscription_count(), 0);
        assert!(!monitor.connect(W));
    }

    #[test]
    #[should_panic(expected = "without a connected window")]
    fn observing_without_window_panics() {
        WindowMonitor::new().observe(WindowAttribute::Visible, |_, _| ObserverFlow::Continue);
    }
}
