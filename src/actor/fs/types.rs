use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }

    /// Combine a pending change with a newer event for the same path.
    ///
    /// `None` means the two cancel out (created, then removed in one window).
    pub(super) fn merge(self, newer: Self) -> Option<Self> {
        match (self, newer) {
            (Self::Removed, Self::Created | Self::Modified) => Some(newer),
            (Self::Created, Self::Removed) => None,
            (Self::Modified, Self::Removed) => Some(Self::Removed),
            _ => Some(self),
        }
    }
}

/// One debounced batch of changed paths.
pub(super) type ChangeSet = Vec<(PathBuf, ChangeKind)>;
