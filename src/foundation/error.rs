/// Convenience result type used across pixel8.
pub type Pixel8Result<T> = Result<T, Pixel8Error>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant except [`Pixel8Error::Other`] signals a producer/caller bug rather than a
/// transient condition; the render loop propagates them without retrying.
#[derive(thiserror::Error, Debug)]
pub enum Pixel8Error {
    /// Invalid scene data: root is not a stage, bad stage config, forbidden children.
    #[error("validation error: {0}")]
    Validation(String),

    /// A node kind name that does not map to any element.
    #[error("unknown node kind: <{0}> is not a valid element")]
    UnknownKind(String),

    /// A color string in none of the accepted formats.
    #[error("unsupported color format: {0}")]
    UnsupportedColor(String),

    /// Sprite or font atlas pixels could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterizer or presentation failure.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing scenes.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Pixel8Error {
    /// Build a [`Pixel8Error::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`Pixel8Error::UnknownKind`] value.
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind(kind.into())
    }

    /// Build a [`Pixel8Error::UnsupportedColor`] value.
    pub fn unsupported_color(input: impl Into<String>) -> Self {
        Self::UnsupportedColor(input.into())
    }

    /// Build a [`Pixel8Error::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`Pixel8Error::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`Pixel8Error::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
