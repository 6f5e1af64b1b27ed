use chrono::{Datelike, Local, NaiveDate};

/// Which fiscal period, relative to the reference date, a metric is read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Last,
    Current,
    Next,
}

/// The two ways a report may label the same fiscal period: `"2024"` or `"2023/24"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearPair {
    pub plain: String,
    pub cross: String,
}

impl YearPair {
    pub fn for_year(year: i32) -> Self {
        Self {
            plain: year.to_string(),
            cross: format!("{}/{:02}", year - 1, year.rem_euclid(100)),
        }
    }

    /// Lookup order: plain label first, cross label second.
    pub fn candidates(&self) -> [&str; 2] {
        [&self.plain, &self.cross]
    }
}

/// Year labels for last, current and next period, fixed once per extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearContext {
    last: YearPair,
    current: YearPair,
    next: YearPair,
}

impl YearContext {
    pub fn from_date(today: NaiveDate) -> Self {
        let year = today.year();
        Self {
            last: YearPair::for_year(year - 1),
            current: YearPair::for_year(year),
            next: YearPair::for_year(year + 1),
        }
    }

    pub fn now() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn labels(&self, period: Period) -> &YearPair {
        match period {
            Period::Last => &self.last,
            Period::Current => &self.current,
            Period::Next => &self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_around_reference_year() {
        let ctx = YearContext::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        assert_eq!(ctx.labels(Period::Last).plain, "2023");
        assert_eq!(ctx.labels(Period::Last).cross, "2022/23");
        assert_eq!(ctx.labels(Period::Current).plain, "2024");
        assert_eq!(ctx.labels(Period::Current).cross, "2023/24");
        assert_eq!(ctx.labels(Period::Next).plain, "2025");
        assert_eq!(ctx.labels(Period::Next).cross, "2024/25");
    }

    #[test]
    fn cross_label_wraps_century() {
        let pair = YearPair::for_year(2000);
        assert_eq!(pair.cross, "1999/00");
        assert_eq!(pair.candidates(), ["2000", "1999/00"]);
    }
}
