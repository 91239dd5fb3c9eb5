use super::status::ReviewStatus;
use std::fmt;

pub const ALL_LABEL: &str = "All";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReviewStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ReviewStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Next option in selector order: All, then each status, wrapping.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(ReviewStatus::ALL[0]),
            StatusFilter::Only(s) => {
                let idx = ReviewStatus::ALL.iter().position(|&x| x == s).unwrap_or(0);
                match ReviewStatus::ALL.get(idx + 1) {
                    Some(&next) => StatusFilter::Only(next),
                    None => StatusFilter::All,
                }
            }
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        if label == ALL_LABEL {
            return Some(StatusFilter::All);
        }
        ReviewStatus::from_label(label).map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(ALL_LABEL),
            StatusFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn new(label: &str) -> Self {
        if label == ALL_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    /// A SKU without a catalog entry only passes the `All` filter.
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }

    /// Next option given the catalog's categories: All, then each category, wrapping.
    pub fn next(&self, categories: &[String]) -> Self {
        let idx = match self {
            CategoryFilter::All => 0,
            CategoryFilter::Only(c) => match categories.iter().position(|x| x == c) {
                Some(i) => i + 1,
                None => return CategoryFilter::All,
            },
        };
        match categories.get(idx) {
            Some(c) => CategoryFilter::Only(c.clone()),
            None => CategoryFilter::All,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_LABEL),
            CategoryFilter::Only(c) => f.write_str(c),
        }
    }
}
