use std::collections::BTreeMap;

use storage::{
    Store,
    dto::{
        course::{CourseListFilter, CourseStats, CourseWithStats},
        review::CourseReviewsFilter,
    },
    models::Review,
    services::{
        aggregation::{aggregate_course_stats, merge_course_stats},
        payload::map_payload_to_array,
    },
};

use crate::error::WebResult;

/// Statistics for every course, recomputed from the full review set
pub async fn course_stats(store: &dyn Store) -> WebResult<BTreeMap<String, CourseStats>> {
    let courses = store.list_courses().await?;
    let reviews = store.list_all_reviews().await?;

    let stats = aggregate_course_stats(courses.into_iter().map(|c| c.course_id), &reviews)
        .into_iter()
        .map(|(course_id, stats)| (course_id, stats.rounded()))
        .collect();

    Ok(stats)
}

/// The catalog merged with statistics, ordered per `filter`
pub async fn list_courses(
    store: &dyn Store,
    filter: &CourseListFilter,
) -> WebResult<Vec<CourseWithStats>> {
    let courses = store.list_courses().await?;
    let reviews = store.list_all_reviews().await?;

    let course_ids = courses.iter().map(|c| c.course_id.clone());
    let stats: BTreeMap<String, CourseStats> = aggregate_course_stats(course_ids, &reviews)
        .into_iter()
        .map(|(course_id, stats)| (course_id, stats.rounded()))
        .collect();
    let merged = merge_course_stats(courses, &stats);

    Ok(map_payload_to_array(
        merged,
        filter.sort.as_deref(),
        filter.order,
    ))
}

/// One course with statistics over its own reviews
pub async fn get_course(store: &dyn Store, course_id: &str) -> WebResult<CourseWithStats> {
    let course = store.find_course(course_id).await?;
    let reviews = store
        .list_course_reviews(course_id, &CourseReviewsFilter::default())
        .await?;

    let stats = aggregate_course_stats([course_id], &reviews)
        .remove(course_id)
        .unwrap_or_else(|| CourseStats::empty(course_id))
        .rounded();

    Ok(CourseWithStats { course, stats })
}

/// Reviews of one course, newest first; 404 when the course does not exist
pub async fn list_course_reviews(
    store: &dyn Store,
    course_id: &str,
    filter: &CourseReviewsFilter,
) -> WebResult<Vec<Review>> {
    store.find_course(course_id).await?;
    Ok(store.list_course_reviews(course_id, filter).await?)
}
