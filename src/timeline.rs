// ⏰ Timeline
// Builds the contiguous monthly period sequence the generator walks.
// Periods are stamped with the month-END date, matching the convention
// of monthly observation series.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// TIME PERIOD
// ============================================================================

/// One monthly step of the generated series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    /// Last calendar day of the month
    pub date: NaiveDate,

    pub year: i32,

    /// 1-12
    pub month: u32,

    /// Zero-based months since the sequence start
    pub offset: usize,
}

/// Last day of the given month
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Build the monthly timeline: `periods` consecutive months starting at the
/// month of `start`, each stamped with its month-end date
pub fn build_timeline(start: NaiveDate, periods: usize) -> Result<Vec<TimePeriod>> {
    let mut timeline = Vec::with_capacity(periods);

    for offset in 0..periods {
        let total_months = start.year() as i64 * 12 + (start.month0() as i64) + offset as i64;
        let year = total_months.div_euclid(12) as i32;
        let month = total_months.rem_euclid(12) as u32 + 1;

        let date = month_end(year, month)
            .with_context(|| format!("date out of range at offset {} ({}-{})", offset, year, month))?;

        timeline.push(TimePeriod {
            date,
            year,
            month,
            offset,
        });
    }

    Ok(timeline)
}

// ============================================================================
// TESTS
// ============================================================================
