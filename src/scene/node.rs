use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::scene::props::Props;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeKind {
    Stage,
    Rect,
    Circ,
    Pixel,
    Sprite,
    Text,
    Textbox,
    Transition,
    Callback,
    List,
    Nothing,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Rect => "rect",
            Self::Circ => "circ",
            Self::Pixel => "pixel",
            Self::Sprite => "sprite",
            Self::Text => "text",
            Self::Textbox => "textbox",
            Self::Transition => "transition",
            Self::Callback => "callback",
            Self::List => "list",
            Self::Nothing => "nothing",
        }
    }

    /// Leaf shapes reject children outright.
    pub fn accepts_children(self) -> bool {
        !matches!(self, Self::Pixel | Self::Text | Self::Sprite)
    }

    /// Kinds with no box of their own; they pass their parent's box through.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Transition | Self::Callback | Self::List | Self::Nothing
        )
    }
}

impl FromStr for NodeKind {
    type Err = Pixel8Error;

    fn from_str(s: &str) -> Pixel8Result<Self> {
        Ok(match s {
            "stage" => Self::Stage,
            "rect" => Self::Rect,
            "circ" => Self::Circ,
            "pixel" => Self::Pixel,
            "sprite" => Self::Sprite,
            "text" => Self::Text,
            "textbox" => Self::Textbox,
            "transition" => Self::Transition,
            "callback" => Self::Callback,
            "list" => Self::List,
            "nothing" => Self::Nothing,
            other => return Err(Pixel8Error::unknown_kind(other)),
        })
    }
}

impl TryFrom<String> for NodeKind {
    type Error = Pixel8Error;

    fn try_from(s: String) -> Pixel8Result<Self> {
        s.parse()
    }
}

impl From<NodeKind> for String {
    fn from(k: NodeKind) -> Self {
        k.name().to_owned()
    }
}

/// Identity of a child within a `list`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(u64),
    Name(String),
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Name(v.to_owned())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Self::Index(v)
    }
}

impl From<usize> for Key {
    fn from(v: usize) -> Self {
        Self::Index(v as u64)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Props::default(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> Option<&Key> {
        self.props.key.as_ref()
    }

    pub fn from_json_str(s: &str) -> Pixel8Result<Self> {
        serde_json::from_str(s).map_err(|e| Pixel8Error::serde(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Pixel8Result<Self> {
        let f = File::open(path)
            .map_err(|e| Pixel8Error::serde(format!("open scene '{}': {e}", path.display())))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| Pixel8Error::serde(format!("parse scene '{}': {e}", path.display())))
    }

    pub fn to_json_pretty(&self) -> Pixel8Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Pixel8Error::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
