use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// A gapless daily demand series for one SKU.
///
/// Index `i` corresponds to the calendar day `start_date + i`. Days without
/// sales carry an explicit zero. A series is never empty: building one from
/// no observations yields `None`, and callers are expected to check that
/// before handing the series to a predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    /// Normalize raw (date, quantity) observations into a daily series.
    ///
    /// Observations may arrive unsorted, with gaps, and with several rows
    /// per date; quantities on a shared date are summed. The result spans
    /// every day from the earliest to the latest observed date inclusive.
    pub fn from_observations<I>(observations: I) -> Option<Self>
    where
        I: IntoIterator<Item = (NaiveDate, i64)>,
    {
        let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for (date, quantity) in observations {
            *totals.entry(date).or_insert(0) += quantity;
        }

        let (&start, _) = totals.iter().next()?;
        let (&end, _) = totals.iter().next_back()?;

        let values = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| totals.get(&day).copied().unwrap_or(0) as f64)
            .collect();

        Some(Self { start, values })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last observed day covered by the series.
    pub fn end_date(&self) -> NaiveDate {
        self.start + Days::new(self.values.len() as u64 - 1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
