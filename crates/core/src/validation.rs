//! Chapter validation
//!
//! Every chapter that enters a book goes through [`ChapterValidator`]. The
//! validator never touches the book itself: it hands back a [`Chapter`] with a
//! fresh id and the caller appends it.

use crate::error::ChapterRejection;
use crate::types::{Chapter, ChapterId, Timestamp};
use log::debug;

/// User-entered chapter fields before validation
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterCandidate {
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl ChapterCandidate {
    pub fn new(title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
        }
    }
}

/// Validates candidate chapters against the owning book's duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChapterValidator {
    total_duration: f64,
}

impl ChapterValidator {
    /// Creates a validator for a book of `total_duration` seconds
    ///
    /// A duration of zero (or anything non-finite) means the transport has not
    /// reported metadata yet; the upper bound is then not enforced.
    pub fn new(total_duration: f64) -> Self {
        Self { total_duration }
    }

    /// Returns the duration this validator checks against
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Checks the rules in order: title, positive length, range
    pub fn check(&self, candidate: &ChapterCandidate) -> Result<(), ChapterRejection> {
        let ChapterCandidate {
            title,
            start_time,
            end_time,
        } = candidate;

        if title.trim().is_empty() {
            return Err(ChapterRejection::EmptyTitle);
        }

        // NaN bounds are a range problem, not a length problem
        let comparable = !start_time.is_nan() && !end_time.is_nan();
        if comparable && end_time <= start_time {
            return Err(ChapterRejection::NonPositiveDuration {
                start_time: *start_time,
                end_time: *end_time,
            });
        }

        let upper_ok = if self.has_known_duration() {
            *end_time <= self.total_duration
        } else {
            end_time.is_finite()
        };

        if !comparable || *start_time < 0.0 || !upper_ok {
            return Err(ChapterRejection::OutOfRange {
                start_time: *start_time,
                end_time: *end_time,
                total_duration: self.total_duration,
            });
        }

        Ok(())
    }

    /// Validates `candidate` and assigns it an id unique within `existing`
    pub fn accept(
        &self,
        candidate: ChapterCandidate,
        existing: &[Chapter],
    ) -> Result<Chapter, ChapterRejection> {
        self.accept_at(candidate, existing, Timestamp::now())
    }

    /// Same as [`Self::accept`] with an explicit creation time
    pub fn accept_at(
        &self,
        candidate: ChapterCandidate,
        existing: &[Chapter],
        created: Timestamp,
    ) -> Result<Chapter, ChapterRejection> {
        if let Err(rejection) = self.check(&candidate) {
            debug!("Rejected chapter '{}': {}", candidate.title, rejection);
            return Err(rejection);
        }

        let id = unique_id(created, existing);
        debug!(
            "Accepted chapter '{}' ({}s-{}s) as {}",
            candidate.title, candidate.start_time, candidate.end_time, id
        );

        Ok(Chapter::new(
            id,
            candidate.title,
            candidate.start_time,
            candidate.end_time,
        ))
    }

    fn has_known_duration(&self) -> bool {
        self.total_duration.is_finite() && self.total_duration > 0.0
    }
}

/// Timestamp plus insertion index, bumped past any id already in the list
fn unique_id(created: Timestamp, existing: &[Chapter]) -> ChapterId {
    let mut index = existing.len();
    loop {
        let id = ChapterId::generate(created, index);
        if existing.iter().all(|chapter| chapter.id != id) {
            return id;
        }
        index += 1;
    }
}
