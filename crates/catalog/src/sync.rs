use storage::Store;
use storage::models::Course;

use crate::client::CatalogClient;
use crate::error::Result;

/// Upserts every catalog course into the store, returning how many were written.
pub async fn sync_courses(client: &CatalogClient, store: &dyn Store) -> Result<usize> {
    let courses = client.courses().await?;
    tracing::info!("Fetched {} courses from catalog", courses.len());

    let mut written = 0;
    for (key, entry) in courses {
        if key != entry.course_id {
            tracing::warn!(
                "Catalog key {} does not match course id {}, using course id",
                key,
                entry.course_id
            );
        }

        let course = Course::from(entry);
        store.upsert_course(&course).await?;
        tracing::debug!("Upserted course {}", course.course_id);
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use storage::repository::CourseStore;
    use storage::repository::memory::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_sync_upserts_catalog_courses() {
        let app = Router::new().route(
            "/courses.json",
            get(|| async {
                Json(json!({
                    "CS-6200": {
                        "courseId": "CS-6200",
                        "name": "Graduate Introduction to Operating Systems",
                        "departmentId": "CS",
                        "courseNumber": "6200",
                        "url": "https://omscs.gatech.edu/cs-6200-introduction-operating-systems",
                        "aliases": ["GIOS"],
                        "isFoundational": true
                    },
                    "CS-6250": {
                        "courseId": "CS-6250",
                        "name": "Computer Networks",
                        "departmentId": "CS",
                        "courseNumber": "6250",
                        "url": null
                    }
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = CatalogClient::new(format!("http://{}", addr), Duration::from_secs(60)).unwrap();
        let store = MemoryStore::new();

        let written = sync_courses(&client, &store).await.unwrap();

        assert_eq!(written, 2);
        let gios = store.find_course("CS-6200").await.unwrap();
        assert_eq!(gios.aliases, vec!["GIOS".to_string()]);
        assert!(gios.is_foundational);
        assert_eq!(store.list_courses().await.unwrap().len(), 2);
    }
}
