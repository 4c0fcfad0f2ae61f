use axum::Router;

use crate::features::{courses, recents, reference, reviews, users};
use crate::state::AppState;

/// All `/api` routes with state applied
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/courses", courses::routes::routes())
        .nest("/reviews", reviews::routes::routes(state.clone()))
        .nest("/recents", recents::routes::routes())
        .nest("/users", users::routes::routes(state.clone()))
        .nest("/reference", reference::routes::routes());

    Router::new().nest("/api", api).with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use catalog::CatalogClient;
    use serde_json::{Value, json};
    use storage::{
        models::Review,
        repository::{ReviewStore, memory::MemoryStore},
        test_fixtures,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::middleware::auth::Moderators;
    use crate::session::{AuthUser, testing::StaticSessions};

    const OWNER_TOKEN: &str = "owner-token";
    const OTHER_TOKEN: &str = "other-token";
    const MODERATOR_TOKEN: &str = "moderator-token";

    struct Harness {
        store: Arc<MemoryStore>,
        owner: Uuid,
        app: Router,
    }

    fn harness() -> Harness {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let moderator = Uuid::new_v4();

        let store = Arc::new(MemoryStore::with_courses([
            test_fixtures::course("CS-6200"),
            test_fixtures::course("CS-6515"),
        ]));

        let user = |user_id: Uuid, email: &str| AuthUser {
            user_id,
            email: Some(email.to_string()),
        };
        let sessions = StaticSessions::default()
            .with(OWNER_TOKEN, user(owner, "owner@gatech.edu"))
            .with(OTHER_TOKEN, user(other, "other@example.com"))
            .with(MODERATOR_TOKEN, user(moderator, "mod@gatech.edu"));

        let catalog =
            CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(60)).unwrap();

        let state = AppState::new(
            store.clone(),
            Arc::new(sessions),
            Arc::new(catalog),
            Moderators::from_comma_separated(&moderator.to_string()),
            5,
            2,
        );

        Harness {
            store,
            owner,
            app: router(state),
        }
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn new_review(course_id: &str) -> Value {
        json!({
            "course_id": course_id,
            "year": 2024,
            "semester": "fall",
            "workload": 15.5,
            "difficulty": 4,
            "overall": 5,
            "body": "Projects are long but the lectures are excellent."
        })
    }

    async fn seed_owned_review(h: &Harness) -> Review {
        let mut review = test_fixtures::review("CS-6200", 1);
        review.reviewer_id = h.owner;
        h.store.insert_review(&review).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_review_requires_session() {
        let h = harness();

        let (status, _) = send(
            &h.app,
            request(Method::POST, "/api/reviews", None, Some(new_review("CS-6200"))),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(h.store.list_all_reviews().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_review_stamps_caller_and_refreshes_recents() {
        let h = harness();

        let (status, created) = send(
            &h.app,
            request(
                Method::POST,
                "/api/reviews",
                Some(OWNER_TOKEN),
                Some(new_review("CS-6200")),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["reviewer_id"], json!(h.owner.to_string()));
        assert_eq!(created["semester"], json!("fall"));

        let (status, recents) = send(&h.app, request(Method::GET, "/api/recents", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(recents.as_array().map(Vec::len), Some(1));
        assert_eq!(recents[0]["review_id"], created["review_id"]);
    }

    #[tokio::test]
    async fn test_create_review_for_unknown_course_is_rejected() {
        let h = harness();

        let (status, _) = send(
            &h.app,
            request(
                Method::POST,
                "/api/reviews",
                Some(OWNER_TOKEN),
                Some(new_review("CS-9999")),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_review_with_out_of_range_rating_is_rejected() {
        let h = harness();
        let mut body = new_review("CS-6200");
        body["overall"] = json!(9);

        let (status, _) = send(
            &h.app,
            request(Method::POST, "/api/reviews", Some(OWNER_TOKEN), Some(body)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden_and_leaves_review_unchanged() {
        let h = harness();
        let review = seed_owned_review(&h).await;

        let (status, _) = send(
            &h.app,
            request(
                Method::PUT,
                &format!("/api/reviews/{}", review.review_id),
                Some(OTHER_TOKEN),
                Some(json!({ "body": "Rewritten by someone else" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        let stored = h.store.find_review(review.review_id).await.unwrap();
        assert_eq!(stored, review);
    }

    #[tokio::test]
    async fn test_update_by_owner_sets_modified_at() {
        let h = harness();
        let review = seed_owned_review(&h).await;

        let (status, updated) = send(
            &h.app,
            request(
                Method::PUT,
                &format!("/api/reviews/{}", review.review_id),
                Some(OWNER_TOKEN),
                Some(json!({ "body": "Edited after the final", "overall": 3 })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["body"], json!("Edited after the final"));
        assert_eq!(updated["overall"], json!(3));
        assert!(!updated["modified_at"].is_null());
        assert_eq!(updated["workload"], json!(review.workload));
    }

    #[tokio::test]
    async fn test_update_of_missing_review_is_not_found() {
        let h = harness();

        let (status, _) = send(
            &h.app,
            request(
                Method::PUT,
                &format!("/api/reviews/{}", Uuid::new_v4()),
                Some(OWNER_TOKEN),
                Some(json!({ "overall": 2 })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let h = harness();
        let review = seed_owned_review(&h).await;

        let (status, _) = send(
            &h.app,
            request(
                Method::DELETE,
                &format!("/api/reviews/{}", review.review_id),
                Some(OTHER_TOKEN),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(h.store.find_review(review.review_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_owner_and_moderator() {
        let h = harness();
        let first = seed_owned_review(&h).await;
        let second = seed_owned_review(&h).await;

        let (status, _) = send(
            &h.app,
            request(
                Method::DELETE,
                &format!("/api/reviews/{}", first.review_id),
                Some(OWNER_TOKEN),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &h.app,
            request(
                Method::DELETE,
                &format!("/api/reviews/{}", second.review_id),
                Some(MODERATOR_TOKEN),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        assert!(h.store.list_all_reviews().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_course_stats_for_course_without_reviews() {
        let h = harness();
        seed_owned_review(&h).await;

        let (status, stats) =
            send(&h.app, request(Method::GET, "/api/courses/stats", None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["CS-6200"]["review_count"], json!(1));
        assert_eq!(stats["CS-6515"]["review_count"], json!(0));
        assert!(stats["CS-6515"]["avg_workload"].is_null());
        assert!(stats["CS-6515"]["avg_overall"].is_null());
    }

    #[tokio::test]
    async fn test_list_courses_sorted_by_review_count() {
        let h = harness();
        seed_owned_review(&h).await;

        let (status, courses) = send(
            &h.app,
            request(
                Method::GET,
                "/api/courses?sort=review_count&order=desc",
                None,
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(courses[0]["course_id"], json!("CS-6200"));
        assert_eq!(courses[1]["course_id"], json!("CS-6515"));
    }

    #[tokio::test]
    async fn test_profile_created_from_session_email() {
        let h = harness();

        let (status, user) = send(
            &h.app,
            request(Method::POST, "/api/users", Some(OWNER_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["has_gt_email"], json!(true));

        let (status, me) = send(
            &h.app,
            request(Method::GET, "/api/users/me", Some(OWNER_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["user_id"], json!(h.owner.to_string()));
    }

    #[tokio::test]
    async fn test_reference_data_unavailable_is_masked_server_error() {
        let h = harness();

        let (status, body) = send(
            &h.app,
            request(Method::GET, "/api/reference/departments", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("Reference data is temporarily unavailable"));
    }

    async fn seed_reviews(h: &Harness, bodies: &[&str]) {
        for (minutes, body) in bodies.iter().enumerate() {
            let mut review = test_fixtures::review("CS-6200", minutes as i64);
            review.body = body.to_string();
            h.store.insert_review(&review).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_recent_reviews_paginated_newest_first() {
        let h = harness();
        seed_reviews(&h, &["oldest", "middle", "newest"]).await;

        let (status, page) = send(
            &h.app,
            request(Method::GET, "/api/reviews/recent?limit=2", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"][0]["body"], json!("newest"));
        assert_eq!(page["data"][1]["body"], json!("middle"));
        assert_eq!(
            page["pagination"],
            json!({"offset": 0, "limit": 2, "total": 3, "has_more": true})
        );

        let (_, last) = send(
            &h.app,
            request(Method::GET, "/api/reviews/recent?limit=2&offset=2", None, None),
        )
        .await;

        assert_eq!(last["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(last["data"][0]["body"], json!("oldest"));
        assert_eq!(last["pagination"]["has_more"], json!(false));
    }

    #[tokio::test]
    async fn test_recent_reviews_search_matches_body() {
        let h = harness();
        seed_reviews(&h, &["Exams were brutal", "Projects only", "No exams at all"]).await;

        let (status, page) = send(
            &h.app,
            request(Method::GET, "/api/reviews/recent?query=EXAMS", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["pagination"]["total"], json!(2));
        assert_eq!(page["data"][0]["body"], json!("No exams at all"));
        assert_eq!(page["data"][1]["body"], json!("Exams were brutal"));
    }

    #[tokio::test]
    async fn test_recent_reviews_rejects_oversized_limit() {
        let h = harness();

        let (status, _) = send(
            &h.app,
            request(Method::GET, "/api/reviews/recent?limit=1000", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_course_recents_scoped_to_course() {
        let h = harness();
        for course_id in ["CS-6200", "CS-6515", "CS-6200"] {
            let (status, _) = send(
                &h.app,
                request(
                    Method::POST,
                    "/api/reviews",
                    Some(OWNER_TOKEN),
                    Some(new_review(course_id)),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, recents) = send(
            &h.app,
            request(Method::GET, "/api/courses/CS-6515/recents", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(recents.as_array().map(Vec::len), Some(1));
        assert_eq!(recents[0]["course_id"], json!("CS-6515"));

        let (_, limited) = send(
            &h.app,
            request(Method::GET, "/api/courses/CS-6200/recents?limit=1", None, None),
        )
        .await;
        assert_eq!(limited.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_get_unknown_review_is_not_found() {
        let h = harness();

        let (status, body) = send(
            &h.app,
            request(
                Method::GET,
                &format!("/api/reviews/{}", Uuid::new_v4()),
                None,
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("Resource not found"));
    }
}
