/// Build mode selected once on the command line.
///
/// Every job consults the mode when its pipeline is assembled, never per file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Readable output with source maps (`--development`, the default).
    #[default]
    Development,
    /// Minified output without source maps (`--production`).
    Production,
}

impl BuildMode {
    /// Resolve the mode from the two mutually exclusive CLI flags.
    pub const fn from_flags(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Check if this is development mode.
    #[inline]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is production mode.
    #[inline]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(BuildMode::from_flags(true), BuildMode::Production);
        assert_eq!(BuildMode::from_flags(false), BuildMode::Development);
    }

    #[test]
    fn test_default_is_development() {
        assert!(BuildMode::default().is_dev());
        assert!(!BuildMode::default().is_production());
    }
}
