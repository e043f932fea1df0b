use std::fmt;

/// Identifies a source file within one analysis session.
///
/// `FileId`s are handed out by whatever loads sources (an editor host, a
/// test fixture); this crate only requires them to be stable for the
/// lifetime of the declarations built from them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    /// Create a file id from its raw index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw index backing this id.
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file({})", self.0)
    }
}
