use std::iter::FusedIterator;

use time::Date;

/// Every calendar day in `[start, end]`, inclusive at both ends.
///
/// Iterates oldest-first; `.rev()` walks newest-first. An inverted range is empty.
#[derive(Debug, Clone)]
pub struct DateAxis {
    front: Date,
    back: Date,
    remaining: usize,
}

impl DateAxis {
    pub fn new(start: Date, end: Date) -> Self {
        let remaining = if start > end {
            0
        } else {
            ((end - start).whole_days() + 1) as usize
        };
        Self {
            front: start,
            back: end,
            remaining,
        }
    }
}

impl Iterator for DateAxis {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.front;
        self.remaining -= 1;
        if self.remaining > 0 {
            // remaining > 0 means front < back, so a successor exists
            self.front = day.next_day()?;
        }
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for DateAxis {
    fn next_back(&mut self) -> Option<Date> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.back;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = day.previous_day()?;
        }
        Some(day)
    }
}

impl ExactSizeIterator for DateAxis {}

impl FusedIterator for DateAxis {}
