use log::debug;

use crate::config::*;

/// Vote counts for the five categories of the current session.
///
/// All the categories are always present. Counts only go up, until the tally
/// is reset for a new session.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteTally {
    counts: [u64; 5],
}

/// The outcome for one category, as shown on the results screen.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryResult {
    pub category: Category,
    pub count: u64,
    /// Rounded to one decimal place.
    pub percentage: f64,
}

/// The complete outcome of a session with at least one vote.
#[derive(PartialEq, Debug, Clone)]
pub struct TallySummary {
    pub total: u64,
    /// One line per category, in the order of `Category::ALL`.
    pub lines: Vec<CategoryResult>,
}

impl VoteTally {
    pub fn new() -> VoteTally {
        VoteTally::default()
    }

    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
        debug!(
            "increment: {:?} -> {} (total {})",
            category,
            self.count(category),
            self.total()
        );
    }

    /// Records a vote given by its button value (-1 to 3).
    pub fn increment_value(&mut self, value: i8) -> Result<Category, KioskError> {
        let category = Category::from_value(value)?;
        self.increment(category);
        Ok(category)
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The share of the votes for this category, in percent, rounded to one
    /// decimal place.
    ///
    /// An empty tally has no percentages: callers are expected to check that
    /// at least one vote was cast before asking.
    pub fn percentage(&self, category: Category) -> Result<f64, KioskError> {
        let total = self.total();
        if total == 0 {
            return Err(KioskError::DivisionByZero);
        }
        let per_mille = (self.count(category) as f64) * 1000.0 / (total as f64);
        Ok(per_mille.round() / 10.0)
    }

    pub fn summary(&self) -> Result<TallySummary, KioskError> {
        if self.is_empty() {
            return Err(KioskError::EmptyReveal);
        }
        let mut lines: Vec<CategoryResult> = Vec::new();
        for category in Category::ALL {
            lines.push(CategoryResult {
                category,
                count: self.count(category),
                percentage: self.percentage(category)?,
            });
        }
        Ok(TallySummary {
            total: self.total(),
            lines,
        })
    }

    pub fn reset(&mut self) {
        self.counts = [0; 5];
    }
}
