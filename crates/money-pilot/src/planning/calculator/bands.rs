//! Ordered threshold tables. Each table is scanned top to bottom and the first
//! band whose bound admits the value wins; values no band admits get the fallback.

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    AtLeast(f64),
    Above(f64),
    Below(f64),
}

impl Bound {
    /// `scale` multiplies the threshold, letting a table be written as fractions of a reference.
    fn admits(self, value: f64, scale: f64) -> bool {
        match self {
            Bound::AtLeast(threshold) => value >= threshold * scale,
            Bound::Above(threshold) => value > threshold * scale,
            Bound::Below(threshold) => value < threshold * scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Band<T> {
    pub bound: Bound,
    pub outcome: T,
}

pub(crate) const fn band<T>(bound: Bound, outcome: T) -> Band<T> {
    Band { bound, outcome }
}

pub(crate) fn classify<'a, T>(bands: &'a [Band<T>], fallback: &'a T, value: f64, scale: f64) -> &'a T {
    bands
        .iter()
        .find(|band| band.bound.admits(value, scale))
        .map(|band| &band.outcome)
        .unwrap_or(fallback)
}
