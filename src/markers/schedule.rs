//! Marker ordering
//!
//! Markers are placed by searching node content for text. A wide span marked
//! first would change the text a narrower span inside it has to find, so
//! locations are applied narrowest first.

use std::cmp::Ordering;

use crate::footnote::{Footnote, Location};

/// A location together with its place in the payload
#[derive(Debug, Clone, Copy)]
pub struct ScheduledLocation<'a> {
    pub footnote: &'a Footnote,
    /// Position of the footnote in the payload
    pub footnote_index: usize,
    /// Position of the location within its footnote
    pub location_index: usize,
    pub location: &'a Location,
    /// Ordering key, see [`Location::ordering_length`]
    pub length: usize,
}

impl Ord for ScheduledLocation<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .cmp(&other.length)
            .then(self.footnote_index.cmp(&other.footnote_index))
            .then(self.location_index.cmp(&other.location_index))
    }
}

impl PartialOrd for ScheduledLocation<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledLocation<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledLocation<'_> {}

/// Application order for every location of every footnote
pub fn schedule(footnotes: &[Footnote]) -> Vec<ScheduledLocation<'_>> {
    let mut scheduled: Vec<ScheduledLocation<'_>> = footnotes
        .iter()
        .enumerate()
        .flat_map(|(footnote_index, footnote)| {
            footnote
                .locations
                .iter()
                .enumerate()
                .map(move |(location_index, location)| ScheduledLocation {
                    footnote,
                    footnote_index,
                    location_index,
                    location,
                    length: location.ordering_length(),
                })
        })
        .collect();

    scheduled.sort();
    scheduled
}
