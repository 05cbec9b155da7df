//! Asset categories of the path table.

use serde::{Deserialize, Serialize};

/// One row of the path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Markup,
    Styles,
    Scripts,
    Images,
    Fonts,
    Favicon,
}

impl Category {
    /// Every category, in path-table order.
    pub const ALL: [Self; 6] = [
        Self::Markup,
        Self::Styles,
        Self::Scripts,
        Self::Images,
        Self::Fonts,
        Self::Favicon,
    ];

    /// Name used in log prefixes and `kiln.toml` section keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Images => "images",
            Self::Fonts => "fonts",
            Self::Favicon => "favicon",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
