//! Node addressing.
//!
//! Every visited node gets a slash-separated address built from its traversal
//! position, e.g. `/view/children/0/then`. Addresses are derived purely from the
//! parent address plus one step, so walking the same tree twice yields the same
//! paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(String);

impl NodePath {
    /// The empty address, rendered as `/`.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Address of the program's root view.
    pub fn view() -> Self {
        Self::root().child("view")
    }

    /// Address of a component definition's body.
    pub fn component_view(name: &str) -> Self {
        Self::root().child("components").child(name).child("view")
    }

    /// `~` and `/` inside a segment are escaped as `~0` and `~1`, as in JSON
    /// Pointer, so a map key can never read as a nested step.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let segment = segment.to_string().replace('~', "~0").replace('/', "~1");
        Self(format!("{}/{}", self.0, segment))
    }

    /// `field/<index>` step, used for ordered lists.
    pub fn indexed(&self, field: &str, index: usize) -> Self {
        self.child(field).child(index)
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "/"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
