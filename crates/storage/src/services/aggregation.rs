use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::dto::course::{CourseStats, CourseWithStats};
use crate::models::{Course, Review};
use crate::services::payload::{SortField, SortValue};

#[derive(Default)]
struct Accumulator {
    count: u32,
    workload: f64,
    difficulty: f64,
    overall: f64,
    staff_support: f64,
    staff_support_count: u32,
    by_term: BTreeMap<i32, BTreeMap<u8, u32>>,
}

impl Accumulator {
    fn add(&mut self, review: &Review) {
        self.count += 1;
        self.workload += review.workload;
        self.difficulty += f64::from(review.difficulty);
        self.overall += f64::from(review.overall);

        if let Some(staff_support) = review.staff_support {
            self.staff_support += f64::from(staff_support);
            self.staff_support_count += 1;
        }

        *self
            .by_term
            .entry(review.year)
            .or_default()
            .entry(review.semester.term())
            .or_default() += 1;
    }

    fn into_stats(self, course_id: String) -> CourseStats {
        let mean = |sum: f64, count: u32| (count > 0).then(|| sum / f64::from(count));

        CourseStats {
            course_id,
            review_count: self.count,
            avg_workload: mean(self.workload, self.count),
            avg_difficulty: mean(self.difficulty, self.count),
            avg_overall: mean(self.overall, self.count),
            avg_staff_support: mean(self.staff_support, self.staff_support_count),
            reviews_by_term: self.by_term,
        }
    }
}

/// Computes statistics for every course in `course_ids` from the full review set.
///
/// Every course id gets an entry, including courses without reviews. Reviews
/// for course ids outside the set are ignored.
pub fn aggregate_course_stats<I, S>(course_ids: I, reviews: &[Review]) -> BTreeMap<String, CourseStats>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut accumulators: HashMap<String, Accumulator> = course_ids
        .into_iter()
        .map(|id| (id.into(), Accumulator::default()))
        .collect();

    for review in reviews {
        if let Some(acc) = accumulators.get_mut(&review.course_id) {
            acc.add(review);
        }
    }

    accumulators
        .into_iter()
        .map(|(course_id, acc)| {
            let stats = acc.into_stats(course_id.clone());
            (course_id, stats)
        })
        .collect()
}

/// Joins static course records with their statistics, keyed by course id.
pub fn merge_course_stats(
    courses: Vec<Course>,
    stats: &BTreeMap<String, CourseStats>,
) -> BTreeMap<String, CourseWithStats> {
    courses
        .into_iter()
        .map(|course| {
            let course_stats = stats
                .get(&course.course_id)
                .cloned()
                .unwrap_or_else(|| CourseStats::empty(course.course_id.clone()));
            (
                course.course_id.clone(),
                CourseWithStats {
                    course,
                    stats: course_stats,
                },
            )
        })
        .collect()
}

impl SortField for CourseWithStats {
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>> {
        match field {
            "course_id" => Some(SortValue::Text(Cow::Borrowed(&self.course.course_id))),
            "name" => Some(SortValue::Text(Cow::Borrowed(&self.course.name))),
            "department_id" => Some(SortValue::Text(Cow::Borrowed(&self.course.department_id))),
            "review_count" => Some(SortValue::Number(f64::from(self.stats.review_count))),
            "avg_workload" => self.stats.avg_workload.map(SortValue::Number),
            "avg_difficulty" => self.stats.avg_difficulty.map(SortValue::Number),
            "avg_overall" => self.stats.avg_overall.map(SortValue::Number),
            "avg_staff_support" => self.stats.avg_staff_support.map(SortValue::Number),
            _ => None,
        }
    }
}
