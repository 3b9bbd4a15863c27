//! Window geometry descriptors.
//!
//! The manager treats a [`GeometryDescriptor`] as an opaque string: it is
//! captured from the windowing layer, stored, and handed back verbatim.
//! Backends that need a concrete encoding use [`FrameSnapshot`], which
//! writes the window frame followed by the visible frame of the screen it
//! was on: `"x y w h sx sy sw sh"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryDescriptor(String);

impl GeometryDescriptor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GeometryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GeometryDescriptor {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: Rect,
    pub screen: Rect,
}

impl FrameSnapshot {
    pub fn new(frame: Rect, screen: Rect) -> Self {
        Self { frame, screen }
    }

    pub fn to_descriptor(&self) -> GeometryDescriptor {
        GeometryDescriptor(self.to_string())
    }

    pub fn parse(descriptor: &GeometryDescriptor) -> Result<Self, DescriptorError> {
        descriptor.as_str().parse()
    }
}

impl fmt::Display for FrameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fr, sc) = (self.frame, self.screen);
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            fr.origin.x,
            fr.origin.y,
            fr.size.width,
            fr.size.height,
            sc.origin.x,
            sc.origin.y,
            sc.size.width,
            sc.size.height
        )
    }
}

impl FromStr for FrameSnapshot {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect::<Vec<_>>();
        if fields.len() != 8 {
            return Err(DescriptorError::FieldCount(fields.len()));
        }
        let mut values = [0.0f64; 8];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DescriptorError::Number((*field).to_string()))?;
        }
        let [x, y, w, h, sx, sy, sw, sh] = values;
        Ok(Self {
            frame: Rect::new(x, y, w, h),
            screen: Rect::new(sx, sy, sw, sh),
        })
    }
}
