use std::f64::consts::PI;
use std::str::FromStr;

use crate::foundation::error::{Pixel8Error, Pixel8Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[default]
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "easeInQuad")]
    InQuad,
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    #[serde(rename = "easeInCubic")]
    InCubic,
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    #[serde(rename = "easeInSine")]
    InSine,
    #[serde(rename = "easeOutSine")]
    OutSine,
    #[serde(rename = "easeInOutSine")]
    InOutSine,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "easeInQuad",
            Self::OutQuad => "easeOutQuad",
            Self::InOutQuad => "easeInOutQuad",
            Self::InCubic => "easeInCubic",
            Self::OutCubic => "easeOutCubic",
            Self::InOutCubic => "easeInOutCubic",
            Self::InSine => "easeInSine",
            Self::OutSine => "easeOutSine",
            Self::InOutSine => "easeInOutSine",
        }
    }

    const ALL: [Ease; 10] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
    ];
}

impl FromStr for Ease {
    type Err = Pixel8Error;

    fn from_str(s: &str) -> Pixel8Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| Pixel8Error::validation(format!("unknown ease '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
