//! Month grid for the calendar view.
//!
//! The grid is always 6 weeks of 7 days, Sunday first, starting with the
//! trailing days of the previous month.

use crate::model::card::Card;
use crate::model::snapshot::Snapshot;
use chrono::{Datelike, Days, NaiveDate};

/// Cells in one month grid.
pub const GRID_DAYS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub cards: Vec<&'a Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Header label such as `March 2025`.
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// Grid rows, one per week.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a>]> + '_ {
        self.days.chunks(7)
    }
}

/// Builds the grid for `year`/`month` (1-based). Returns `None` for an
/// invalid month.
pub fn month_grid(
    snapshot: &Snapshot,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<MonthGrid<'_>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading = u64::from(first.weekday().num_days_from_sunday());
    let mut date = first.checked_sub_days(Days::new(leading))?;

    let mut days = Vec::with_capacity(GRID_DAYS);
    for _ in 0..GRID_DAYS {
        days.push(CalendarDay {
            date,
            in_current_month: date.year() == year && date.month() == month,
            is_today: date == today,
            cards: snapshot
                .cards
                .iter()
                .filter(|card| card.due_date == Some(date))
                .collect(),
        });
        date = date.succ_opt()?;
    }

    Some(MonthGrid { year, month, days })
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
