// src/core/interactions/fragment.rs
use serde::{Deserialize, Serialize};

/// One element of a sequence diagram, handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fragment {
    Arrow(Arrow),
    Alt(Alt),
}

/// A single message sent from one participant to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: String,
}

/// A group of alternative or repeated interactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alt {
    sections: Vec<AltSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltSection {
    /// Only the first section of a group is tagged; later ones render as `else`.
    pub group_type: Option<GroupType>,
    pub label: String,
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupType {
    ForEach,
    Case,
    If,
}

/// Ordered, append-only fragment sequence produced by one traversal call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interactions {
    fragments: Vec<Fragment>,
}

impl Fragment {
    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            Fragment::Arrow(arrow) => Some(arrow),
            Fragment::Alt(_) => None,
        }
    }

    pub fn as_alt(&self) -> Option<&Alt> {
        match self {
            Fragment::Alt(alt) => Some(alt),
            Fragment::Arrow(_) => None,
        }
    }
}

impl Alt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self, section: AltSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[AltSection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl AltSection {
    pub fn new(group_type: Option<GroupType>, label: impl Into<String>, fragments: Vec<Fragment>) -> Self {
        Self {
            group_type,
            label: label.into(),
            fragments,
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Appends everything `other` produced, keeping its order.
    pub fn append(&mut self, other: Interactions) {
        self.fragments.extend(other.fragments);
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// The first top-level arrow, the entry point of the flow.
    pub fn first_arrow_mut(&mut self) -> Option<&mut Arrow> {
        self.fragments.iter_mut().find_map(|f| match f {
            Fragment::Arrow(arrow) => Some(arrow),
            Fragment::Alt(_) => None,
        })
    }

    /// Every arrow in the tree, depth first, in source order.
    pub fn arrows(&self) -> Vec<&Arrow> {
        let mut arrows = Vec::new();
        collect_arrows(&self.fragments, &mut arrows);
        arrows
    }
}

fn collect_arrows<'a>(fragments: &'a [Fragment], out: &mut Vec<&'a Arrow>) {
    for fragment in fragments {
        match fragment {
            Fragment::Arrow(arrow) => out.push(arrow),
            Fragment::Alt(alt) => {
                for section in alt.sections() {
                    collect_arrows(section.fragments(), out);
                }
            }
        }
    }
}

impl From<Arrow> for Fragment {
    fn from(arrow: Arrow) -> Self {
        Fragment::Arrow(arrow)
    }
}

impl From<Alt> for Fragment {
    fn from(alt: Alt) -> Self {
        Fragment::Alt(alt)
    }
}
