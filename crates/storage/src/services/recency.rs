use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Review;

pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_WINDOW_BUFFER: usize = 20;

/// The newest reviews platform-wide and per course.
///
/// Holds `size + buffer` reviews so that up to `buffer` deletions between two
/// rebuilds still leave the true newest `size` in place. There is no
/// incremental update: every refresh goes through [`RecencyWindow::rebuild`].
#[derive(Debug, Clone, Serialize)]
pub struct RecencyWindow {
    pub size: usize,
    pub buffer: usize,
    pub built_at: DateTime<Utc>,
    pub reviews: Vec<Review>,
    pub by_course: BTreeMap<String, Vec<Review>>,
}

impl RecencyWindow {
    pub fn empty(size: usize, buffer: usize) -> Self {
        Self {
            size,
            buffer,
            built_at: Utc::now(),
            reviews: Vec::new(),
            by_course: BTreeMap::new(),
        }
    }

    /// Rebuilds the window from the full review set.
    pub fn rebuild(mut reviews: Vec<Review>, size: usize, buffer: usize) -> Self {
        let capacity = size + buffer;

        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut by_course: BTreeMap<String, Vec<Review>> = BTreeMap::new();
        for review in &reviews {
            let course_reviews = by_course.entry(review.course_id.clone()).or_default();
            if course_reviews.len() < capacity {
                course_reviews.push(review.clone());
            }
        }

        reviews.truncate(capacity);

        Self {
            size,
            buffer,
            built_at: Utc::now(),
            reviews,
            by_course,
        }
    }

    pub fn capacity(&self) -> usize {
        self.size + self.buffer
    }

    /// Newest reviews across all courses, at most `limit`
    pub fn latest(&self, limit: usize) -> &[Review] {
        &self.reviews[..limit.min(self.reviews.len())]
    }

    /// Newest reviews for one course, at most `limit`
    pub fn latest_for_course(&self, course_id: &str, limit: usize) -> &[Review] {
        self.by_course
            .get(course_id)
            .map(|reviews| &reviews[..limit.min(reviews.len())])
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::review;

    #[test]
    fn test_rebuild_keeps_size_plus_buffer_newest() {
        // review(_, n) gets a later timestamp for a larger n
        let reviews: Vec<Review> = (0..80).rev().map(|n| review("CS-6200", n)).collect();

        let window = RecencyWindow::rebuild(reviews, 50, 20);

        assert_eq!(window.reviews.len(), 70);
        assert_eq!(window.capacity(), 70);
        assert!(
            window
                .reviews
                .windows(2)
                .all(|pair| pair[0].created_at > pair[1].created_at)
        );
        assert_eq!(window.reviews[0].created_at, review("CS-6200", 79).created_at);
        assert_eq!(window.reviews[69].created_at, review("CS-6200", 10).created_at);
    }

    #[test]
    fn test_rebuild_sorts_unordered_input() {
        let reviews = vec![review("A", 3), review("A", 9), review("A", 1), review("A", 5)];

        let window = RecencyWindow::rebuild(reviews, 2, 1);

        let order: Vec<_> = window.reviews.iter().map(|r| r.created_at).collect();
        assert_eq!(
            order,
            vec![
                review("A", 9).created_at,
                review("A", 5).created_at,
                review("A", 3).created_at
            ]
        );
    }

    #[test]
    fn test_per_course_lists_truncated_independently() {
        // Course B is older than all of A, so it falls out of the global window
        // but keeps its own per-course list
        let mut reviews: Vec<Review> = (100..110).map(|n| review("A", n)).collect();
        reviews.extend((0..5).map(|n| review("B", n)));

        let window = RecencyWindow::rebuild(reviews, 4, 2);

        assert_eq!(window.reviews.len(), 6);
        assert!(window.reviews.iter().all(|r| r.course_id == "A"));
        assert_eq!(window.by_course["A"].len(), 6);
        assert_eq!(window.by_course["B"].len(), 5);
        assert_eq!(window.by_course["B"][0].created_at, review("B", 4).created_at);
    }

    #[test]
    fn test_latest_tolerates_deletions_within_buffer() {
        let reviews: Vec<Review> = (0..30).map(|n| review("A", n)).collect();
        let mut window = RecencyWindow::rebuild(reviews, 10, 5);

        window.reviews.drain(0..5);

        assert_eq!(window.latest(10).len(), 10);
        assert_eq!(window.latest(100).len(), 10);
    }

    #[test]
    fn test_unknown_course_is_empty() {
        let window = RecencyWindow::rebuild(vec![review("A", 1)], 5, 1);

        assert!(window.latest_for_course("Z", 5).is_empty());
        assert_eq!(window.latest_for_course("A", 5).len(), 1);
    }
}
