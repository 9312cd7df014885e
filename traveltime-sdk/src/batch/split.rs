//! Partitioning of search lists into size-bounded bundles.

use crate::error::TravelTimeError;

/// A contiguous slice of a request's departure and arrival searches, sent
/// as one outbound request.
///
/// Bundle `k` holds the `k`-th slice of both lists; either may be empty.
#[derive(Debug)]
pub struct Bundle<'a, D, A> {
    /// Position in creation order. The only ordering key used downstream.
    pub index: usize,
    pub departures: &'a [D],
    pub arrivals: &'a [A],
}

impl<D, A> Bundle<'_, D, A> {
    /// Combined number of searches.
    pub fn len(&self) -> usize {
        self.departures.len() + self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty() && self.arrivals.is_empty()
    }
}

/// Split departure and arrival searches into bundles of at most
/// `window_size` combined searches.
///
/// Each bundle takes departures first, in order, then fills any remaining
/// room with arrivals, in order. Concatenating the bundles' departures (or
/// arrivals) in bundle order gives back the original list.
///
/// Empty input yields a single empty bundle, so a request without searches
/// still reaches the service exactly once.
///
/// # Errors
///
/// [`TravelTimeError::InvalidConfiguration`] if `window_size` is zero.
///
/// # Examples
///
/// ```
/// use traveltime_sdk::batch::split;
///
/// let departures = [1, 2, 3, 4, 5];
/// let arrivals = ['a', 'b'];
/// let bundles = split(&departures, &arrivals, 3).unwrap();
///
/// assert_eq!(bundles.len(), 3);
/// assert_eq!(bundles[0].departures, &[1, 2, 3]);
/// assert_eq!(bundles[1].departures, &[4, 5]);
/// assert_eq!(bundles[1].arrivals, &['a']);
/// assert_eq!(bundles[2].arrivals, &['b']);
/// ```
pub fn split<'a, D, A>(
    departures: &'a [D],
    arrivals: &'a [A],
    window_size: usize,
) -> Result<Vec<Bundle<'a, D, A>>, TravelTimeError> {
    if window_size == 0 {
        return Err(TravelTimeError::config("window size must be at least 1"));
    }

    if departures.is_empty() && arrivals.is_empty() {
        return Ok(vec![Bundle {
            index: 0,
            departures,
            arrivals,
        }]);
    }

    let total = departures.len() + arrivals.len();
    let mut bundles = Vec::with_capacity(total.div_ceil(window_size));
    let mut remaining_departures = departures;
    let mut remaining_arrivals = arrivals;

    while !remaining_departures.is_empty() || !remaining_arrivals.is_empty() {
        let take_departures = window_size.min(remaining_departures.len());
        let take_arrivals = (window_size - take_departures).min(remaining_arrivals.len());

        let (bundle_departures, rest_departures) = remaining_departures.split_at(take_departures);
        let (bundle_arrivals, rest_arrivals) = remaining_arrivals.split_at(take_arrivals);

        bundles.push(Bundle {
            index: bundles.len(),
            departures: bundle_departures,
            arrivals: bundle_arrivals,
        });

        remaining_departures = rest_departures;
        remaining_arrivals = rest_arrivals;
    }

    Ok(bundles)
}
