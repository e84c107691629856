use std::sync::Arc;

use thiserror::Error;

use crate::layout::LayoutOption;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No units to lay out")]
    NoUnits,
    #[error("Invalid size {width}x{height} for {what}")]
    InvalidSize {
        what: String,
        width: f64,
        height: f64,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// One of the two layout axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right (width, x)
    Horizontal,
    /// Top to bottom (height, y)
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// A width/height pair in abstract, scale-free units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy of this size with the extent along `axis` replaced
    pub fn with_along(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.height),
            Axis::Vertical => Self::new(self.width, value),
        }
    }

    /// Whether both dimensions are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The larger of the two dimensions
    pub fn major(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Fail with [`LayoutError::InvalidSize`] unless [`Size::is_valid`] holds
    pub fn validate(self, what: impl Into<String>) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(LayoutError::InvalidSize {
                what: what.into(),
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}

/// Top-left corner of a placement, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Move along one axis
    pub fn offset(self, axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(self.x + delta, self.y),
            Axis::Vertical => Self::new(self.x, self.y + delta),
        }
    }

    /// The corner diagonally opposite this one for a box of `size`
    pub fn corner(self, size: Size) -> Self {
        Self::new(self.x + size.width, self.y + size.height)
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Equality within [`crate::constants::ANCHOR_TOLERANCE`], relative to the coordinates
    pub fn approx_eq(&self, other: &Point) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= crate::constants::ANCHOR_TOLERANCE * scale
}

/// What a unit stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitKind {
    /// A glyph for a whole word
    WordGlyph,
    /// A syllable glyph inside a proper-name cartouche
    SyllableGlyph,
    /// A punctuation mark, or a sub-layout playing the punctuation role.
    /// Never placed alone to the right of a container.
    Punctuation,
    /// A sub-layout that has already been laid out
    Container,
}

impl UnitKind {
    pub fn is_punctuation(self) -> bool {
        self == UnitKind::Punctuation
    }
}

/// Payload of a unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitContent {
    /// A single token (word, syllable or punctuation name)
    Token(String),
    /// A sub-layout chosen for a nested part, with its separator token if any
    Nested {
        option: Arc<LayoutOption>,
        separator: Option<String>,
    },
}

/// An atomic, sized input to the layout engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    kind: UnitKind,
    base_size: Size,
    content: UnitContent,
}

impl Unit {
    /// Create a unit for a single token
    pub fn token(kind: UnitKind, token: impl Into<String>, base_size: Size) -> Result<Self> {
        let token = token.into();
        let base_size = base_size.validate(format!("unit '{}'", token))?;
        Ok(Self {
            kind,
            base_size,
            content: UnitContent::Token(token),
        })
    }

    /// Wrap a finished layout option so it can be placed as one unit.
    ///
    /// The base size is the option's own (normalized) container size.
    pub fn nested(
        kind: UnitKind,
        option: impl Into<Arc<LayoutOption>>,
        separator: Option<String>,
    ) -> Result<Self> {
        let option = option.into();
        let base_size = option.size().validate("nested container")?;
        Ok(Self {
            kind,
            base_size,
            content: UnitContent::Nested { option, separator },
        })
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn base_size(&self) -> Size {
        self.base_size
    }

    pub fn content(&self) -> &UnitContent {
        &self.content
    }

    /// The token, for token units
    pub fn token_str(&self) -> Option<&str> {
        match &self.content {
            UnitContent::Token(token) => Some(token),
            UnitContent::Nested { .. } => None,
        }
    }

    /// The nested option, for container units
    pub fn nested_option(&self) -> Option<&LayoutOption> {
        match &self.content {
            UnitContent::Nested { option, .. } => Some(option),
            UnitContent::Token(_) => None,
        }
    }

    /// The separator token of a nested unit (`li`, `e`, `cartouche`, ...)
    pub fn separator(&self) -> Option<&str> {
        match &self.content {
            UnitContent::Nested { separator, .. } => separator.as_deref(),
            UnitContent::Token(_) => None,
        }
    }
}
