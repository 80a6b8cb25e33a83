//! # Scene Objects
//!
//! Handles, kinds and descriptors for objects and filters.
//!
//! Handles are nothing more than names: the host may delete an object at any
//! moment, so a handle never proves existence. Every gateway call re-resolves
//! the name.

use donafx_shared::{Transform, Vec2};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a scene object, keyed by its unique name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(Arc<str>);

impl ObjectRef {
    /// Creates a handle for the object called `name`.
    ///
    /// The object does not need to exist.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Returns the object name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a filter attached to an object, keyed by filter name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterRef(Arc<str>);

impl FilterRef {
    /// Creates a handle for the filter called `name`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Returns the filter name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// What a scene object renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Live video (camera, capture, media file)
    Video,
    /// Static image file
    Image,
    /// Solid colour rectangle
    Color,
    /// Text label
    Text,
    /// Geometric shape proxy
    Shape,
    /// Particle sprite proxy
    Particle,
    /// Anything the engine does not model
    Other,
}

impl SourceKind {
    /// Stable lowercase name used in logs and errors
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Color => "color",
            Self::Text => "text",
            Self::Shape => "shape",
            Self::Particle => "particle",
            Self::Other => "other",
        }
    }
}

/// What a filter does to its parent object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Colour correction (hue, saturation, ...)
    ColorCorrection,
    /// Anything the engine does not model
    Other,
}

impl FilterKind {
    /// Stable lowercase name used in logs and errors
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ColorCorrection => "color_filter",
            Self::Other => "filter",
        }
    }
}

/// A single value in an object's or filter's settings bag.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    /// Text value
    Text(String),
    /// Integer value (colours are stored as ARGB integers)
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl SettingValue {
    /// Returns the text, if this is a text value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float, widening integers
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Settings bag of an object or filter.
pub type Settings = BTreeMap<String, SettingValue>;

/// Everything needed to create a scene object.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDescriptor {
    /// Unique object name
    pub name: String,
    /// Object kind
    pub kind: SourceKind,
    /// Initial settings
    pub settings: Settings,
    /// Initial transform
    pub transform: Transform,
    /// Initially visible?
    pub visible: bool,
}

impl ObjectDescriptor {
    /// Creates a visible object at the origin with no settings.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            settings: Settings::new(),
            transform: Transform::IDENTITY,
            visible: true,
        }
    }

    /// Adds one setting.
    #[must_use]
    pub fn with_setting(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.settings.insert(key.to_owned(), value.into());
        self
    }

    /// Sets the initial position.
    #[must_use]
    pub fn at(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    /// Sets the initial scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.transform.scale = scale;
        self
    }
}

/// Everything needed to attach a filter to an object.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDescriptor {
    /// Filter name, unique per parent object
    pub name: String,
    /// Filter kind
    pub kind: FilterKind,
    /// Initial settings
    pub settings: Settings,
}

impl FilterDescriptor {
    /// Creates a filter with no settings.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            settings: Settings::new(),
        }
    }

    /// Adds one setting.
    #[must_use]
    pub fn with_setting(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.settings.insert(key.to_owned(), value.into());
        self
    }
}
