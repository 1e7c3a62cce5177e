//! Descent path through nested message types
//!
//! Each recursive step borrows its parent's path and links a new frame on
//! top, so sibling fields see the same ancestors and never each other's
//! descendants. Nothing is shared or mutated between methods.

/// Immutable stack of message type names from the root to the current
/// position
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionPath<'a> {
    head: Option<&'a str>,
    parent: Option<&'a ExpansionPath<'a>>,
}

impl<'a> ExpansionPath<'a> {
    pub fn root() -> Self {
        Self::default()
    }

    /// A path one level deeper, ending in `type_name`
    pub fn push<'b>(&'b self, type_name: &'b str) -> ExpansionPath<'b> {
        ExpansionPath {
            head: Some(type_name),
            parent: Some(self),
        }
    }

    /// Type names from the innermost frame outwards
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let mut current = Some(self);
        std::iter::from_fn(move || {
            let path = current?;
            let name = path.head?;
            current = path.parent;
            Some(name)
        })
    }

    /// How many times `type_name` is on the path
    pub fn occurrences(&self, type_name: &str) -> usize {
        self.iter().filter(|name| *name == type_name).count()
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Type names from the root inwards
    pub fn to_vec(&self) -> Vec<String> {
        let mut names: Vec<String> = self.iter().map(str::to_string).collect();
        names.reverse();
        names
    }
}
