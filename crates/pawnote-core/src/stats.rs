//! Mood statistics over a recent window.

use crate::entry::{DiaryEntry, Mood};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Length of the statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    #[default]
    Week,
    Month,
}

impl StatsPeriod {
    pub fn days(self) -> i64 {
        match self {
            StatsPeriod::Week => 7,
            StatsPeriod::Month => 30,
        }
    }
}

impl FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    /// Entry count per rating; index 0 is rating 1.
    pub counts: [usize; 5],
    pub total: usize,
    /// `None` when the window has no entries.
    pub average: Option<f64>,
    pub days: i64,
}

impl MoodStats {
    /// Entries dated within the last `period.days()` days, today included.
    pub fn compute<'a>(
        entries: impl IntoIterator<Item = &'a DiaryEntry>,
        period: StatsPeriod,
        today: NaiveDate,
    ) -> Self {
        let days = period.days();
        let from = today - Duration::days(days - 1);
        let mut counts = [0usize; 5];
        let mut sum = 0usize;

        for entry in entries {
            if entry.date < from || entry.date > today {
                continue;
            }
            let value = usize::from(entry.mood.value());
            counts[value - usize::from(Mood::MIN)] += 1;
            sum += value;
        }

        let total = counts.iter().sum();
        let average = (total > 0).then(|| sum as f64 / total as f64);
        Self {
            counts,
            total,
            average,
            days,
        }
    }

    pub fn count(&self, rating: u8) -> usize {
        rating
            .checked_sub(Mood::MIN)
            .and_then(|i| self.counts.get(usize::from(i)).copied())
            .unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        match self.average {
            None => format!("No entries saved in the last {} days.", self.days),
            Some(avg) => format!(
                "Average paw mood over the last {} days: {avg:.1} ({} entries)",
                self.days, self.total
            ),
        }
    }
}
