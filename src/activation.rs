//! Scene activation protocol.
//!
//! A request to open a scene travels as `<scheme>://<scene-id>` with the
//! scene id percent-encoded into the host. The same URL is both what the
//! app dispatches to open a new window and what it intercepts on the way
//! in to redirect single-window scenes to their existing window.

use std::collections::VecDeque;

use url::Url;

use crate::error::ActivationError;
use crate::scene::SceneId;

/// Whether an inbound activation was consumed or should continue to the
/// normal scene-creation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationResult {
    Handled,
    PassThrough,
}

pub fn activation_url(scheme: &str, scene: &str) -> Result<Url, ActivationError> {
    if scene.is_empty() {
        return Err(ActivationError::MissingScene(format!("{scheme}://")));
    }
    let url = Url::parse(&format!("{scheme}://{}", urlencoding::encode(scene)))?;
    if url.scheme() != scheme {
        return Err(ActivationError::Scheme(scheme.to_string()));
    }
    Ok(url)
}

/// Extracts the scene id from an activation URL for `scheme`.
pub fn scene_from_url(url: &Url, scheme: &str) -> Result<SceneId, ActivationError> {
    if url.scheme() != scheme {
        return Err(ActivationError::Scheme(url.scheme().to_string()));
    }
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| ActivationError::MissingScene(url.to_string()))?;
    let scene = urlencoding::decode(host)
        .map_err(|_| ActivationError::MissingScene(url.to_string()))?;
    Ok(SceneId::new(scene.into_owned()))
}

/// Outbound path for "please open a window of this scene" requests.
pub trait ActivationChannel {
    fn dispatch(&mut self, url: &Url) -> Result<(), ActivationError>;
}

impl<T: ActivationChannel + ?Sized> ActivationChannel for &mut T {
    fn dispatch(&mut self, url: &Url) -> Result<(), ActivationError> {
        (**self).dispatch(url)
    }
}

/// Hands the URL to the OS so the registered handler (normally this app)
/// receives it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemChannel;

impl ActivationChannel for SystemChannel {
    fn dispatch(&mut self, url: &Url) -> Result<(), ActivationError> {
        tracing::debug!(%url, "opening activation url");
        open::that(url.as_str()).map_err(|source| ActivationError::Dispatch {
            url: url.to_string(),
            source,
        })
    }
}

/// In-process channel: dispatched URLs queue up until the app drains them.
#[derive(Debug, Default, Clone)]
pub struct QueueChannel {
    pending: VecDeque<Url>,
}

impl QueueChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl ActivationChannel for QueueChannel {
    fn dispatch(&mut self, url: &Url) -> Result<(), ActivationError> {
        self.pending.push_back(url.clone());
        Ok(())
    }
}
