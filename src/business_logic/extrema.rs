/// Indices of strict local maxima and minima in a price series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extrema {
    pub peaks: Vec<usize>,
    pub troughs: Vec<usize>,
}

impl Extrema {
    /// Scan a series for strict local extrema.
    ///
    /// A point is a peak when it is strictly greater than both neighbours and a
    /// trough when strictly smaller. Endpoints lack a neighbour and are never
    /// extrema, and a value equal to either neighbour (plateau) is neither.
    pub fn extract(series: &[f64]) -> Self {
        let mut extrema = Self::default();

        for (offset, w) in series.windows(3).enumerate() {
            let (prev, cur, next) = (w[0], w[1], w[2]);
            if cur > prev && cur > next {
                extrema.peaks.push(offset + 1);
            } else if cur < prev && cur < next {
                extrema.troughs.push(offset + 1);
            }
        }

        extrema
    }

    /// Last `N` peak indices, or `None` if fewer exist
    pub fn last_peaks<const N: usize>(&self) -> Option<[usize; N]> {
        last_n(&self.peaks)
    }

    /// Last `N` trough indices, or `None` if fewer exist
    pub fn last_troughs<const N: usize>(&self) -> Option<[usize; N]> {
        last_n(&self.troughs)
    }

    /// Troughs strictly between two indices
    pub fn troughs_between(&self, start: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
        self.troughs
            .iter()
            .copied()
            .filter(move |&t| t > start && t < end)
    }
}

fn last_n<const N: usize>(indices: &[usize]) -> Option<[usize; N]> {
    let start = indices.len().checked_sub(N)?;
    indices[start..].try_into().ok()
}
