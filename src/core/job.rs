//! Job identifiers and run reports.

use super::Category;
use crate::utils::plural::plural_count;

/// A named, triggerable task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {
    Markup,
    Styles,
    Scripts,
    Images,
    Fonts,
    Favicon,
    CleanImages,
    CleanDist,
}

impl Job {
    /// Per-category build jobs run by the aggregate entry point.
    pub const BUILD: [Self; 6] = [
        Self::Markup,
        Self::Styles,
        Self::Scripts,
        Self::Images,
        Self::Fonts,
        Self::Favicon,
    ];

    /// Short name used in log prefixes (matches the CLI subcommand).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Styles => "css",
            Self::Scripts => "js",
            Self::Images => "img",
            Self::Fonts => "fonts",
            Self::Favicon => "favicon",
            Self::CleanImages => "clean-img",
            Self::CleanDist => "clean-dist",
        }
    }

    /// Job that rebuilds a category.
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Markup => Self::Markup,
            Category::Styles => Self::Styles,
            Category::Scripts => Self::Scripts,
            Category::Images => Self::Images,
            Category::Fonts => Self::Fonts,
            Category::Favicon => Self::Favicon,
        }
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a job run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Files written to the destination (or removed, for cleanup jobs).
    pub written: usize,
    /// Matched files left alone because the destination was fresh.
    pub skipped: usize,
}

impl JobReport {
    pub const fn new(written: usize, skipped: usize) -> Self {
        Self { written, skipped }
    }

    pub fn summary(&self) -> String {
        let written = plural_count(self.written, "file");
        if self.skipped == 0 {
            written
        } else {
            format!("{written}, {} unchanged", self.skipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_build_job() {
        for category in Category::ALL {
            assert!(Job::BUILD.contains(&Job::for_category(category)));
        }
    }

    #[test]
    fn test_names_match_subcommands() {
        assert_eq!(Job::Markup.name(), "html");
        assert_eq!(Job::CleanDist.to_string(), "clean-dist");
    }

    #[test]
    fn test_report_summary() {
        assert_eq!(JobReport::new(1, 0).summary(), "1 file");
        assert_eq!(JobReport::new(3, 2).summary(), "3 files, 2 unchanged");
    }
}
