mod common;

use common::*;
use rukun::media::UploadFile;
use rukun::models::ScheduleCategory;
use rukun::services::{ActivityDraft, ScheduleDraft};
use rukun::Error;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn activity_row(id: &str, slug: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Kerja Bakti RT",
        "slug": slug,
        "excerpt": "Bersih-bersih lingkungan",
        "content": "<p>Laporan kegiatan</p>",
        "main_image": "https://example.com/main.jpg",
        "gallery": [],
        "date": 1_700_000_000_000_i64,
        "status": "published",
        "is_featured": false,
        "created_at": 1_700_000_000_000_i64
    })
}

#[tokio::test]
async fn save_activity_uploads_images_and_upserts_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(
            r"^/storage/v1/object/portal-media/activities/post-1/main_\d+_cover\.jpg$",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(
            r"^/storage/v1/object/portal-media/activities/post-1/gallery_\d+_foto\.jpg$",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/activities"))
        .and(query_param("on_conflict", "id"))
        .and(body_partial_json(json!({
            "id": "post-1",
            "slug": "kerja-bakti-rt",
            "status": "published",
            "author": { "uid": "admin-1", "display_name": "User admin-1" }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let id = portal
        .activities()
        .save(
            &admin_context(),
            ActivityDraft {
                id: Some("post-1".to_string()),
                title: "Kerja Bakti RT!!".to_string(),
                excerpt: "Bersih-bersih lingkungan".to_string(),
                content: "<p>Laporan kegiatan</p>".to_string(),
                date: 1_700_000_000_000,
                ..Default::default()
            },
            Some(UploadFile::new("cover.jpg", vec![1])),
            vec![UploadFile::new("foto.jpg", vec![2])],
        )
        .await
        .unwrap();

    assert_eq!(id, "post-1");
}

#[tokio::test]
async fn save_activity_without_new_cover_keeps_the_existing_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/activities"))
        .and(body_partial_json(json!({
            "main_image": "https://example.com/existing.jpg"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    portal
        .activities()
        .save(
            &admin_context(),
            ActivityDraft {
                id: Some("post-1".to_string()),
                title: "Rapat Warga".to_string(),
                main_image: Some("https://example.com/existing.jpg".to_string()),
                ..Default::default()
            },
            None,
            vec![],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn save_activity_requires_an_admin() {
    let mock_server = MockServer::start().await;

    let portal = portal(&mock_server.uri());
    let result = portal
        .activities()
        .save(&resident_context(), ActivityDraft::default(), None, vec![])
        .await;

    assert!(matches!(result, Err(Error::Forbidden(_))));
}

#[tokio::test]
async fn published_activities_are_filtered_and_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/activities"))
        .and(query_param("status", "eq.published"))
        .and(query_param("order", "date.desc"))
        .and(query_param("limit", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([activity_row("a1", "kerja-bakti-rt")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let posts = portal.activities().published(Some(3)).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "kerja-bakti-rt");
}

#[tokio::test]
async fn activity_lookup_by_slug_returns_the_first_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/activities"))
        .and(query_param("slug", "eq.kerja-bakti-rt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            activity_row("a1", "kerja-bakti-rt"),
            activity_row("a2", "kerja-bakti-rt"),
        ])))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let post = portal.activities().by_slug("kerja-bakti-rt").await.unwrap();

    assert_eq!(post.map(|activity| activity.id), Some("a1".to_string()));
}

#[tokio::test]
async fn activity_lookup_by_unknown_slug_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let post = portal.activities().by_slug("tidak-ada").await.unwrap();

    assert!(post.is_none());
}

#[tokio::test]
async fn delete_activity_removes_only_the_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/activities"))
        .and(query_param("id", "eq.a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/storage/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    portal
        .activities()
        .delete(&admin_context(), "a1")
        .await
        .unwrap();
}

#[tokio::test]
async fn upcoming_schedules_query_from_today_onward() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/schedules"))
        .and(query_param("order", "date.asc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "s1",
            "title": "Rapat RT",
            "date": 9_999_999_999_999_i64,
            "start_time": "19:00 WIB",
            "location": "Balai warga",
            "category": "rapat"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let upcoming = portal.schedules().upcoming(None).await.unwrap();

    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].category, ScheduleCategory::Rapat);
}

#[tokio::test]
async fn save_schedule_defaults_the_category() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/schedules"))
        .and(query_param("on_conflict", "id"))
        .and(body_partial_json(json!({
            "title": "Arisan Warga",
            "category": "sosial"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let id = portal
        .schedules()
        .save(
            &admin_context(),
            ScheduleDraft {
                title: "Arisan Warga".to_string(),
                date: 1_700_000_000_000,
                start_time: "16:00 WIB".to_string(),
                location: "Blok C".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!id.is_empty());
}

#[tokio::test]
async fn gallery_upload_writes_blob_then_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(
            r"^/storage/v1/object/portal-media/gallery/[0-9a-f-]+_\d+_foto\.jpg$",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/gallery"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let item = portal
        .gallery()
        .upload(&admin_context(), UploadFile::new("foto.jpg", vec![1, 2, 3]))
        .await
        .unwrap();

    assert!(item.url.contains("/storage/v1/object/public/portal-media/gallery/"));
    assert!(item.storage_path.starts_with("gallery/"));
}

#[tokio::test]
async fn gallery_delete_survives_a_missing_blob() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/portal-media/gallery/gone.jpg"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Object not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/gallery"))
        .and(query_param("id", "eq.g1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    portal
        .gallery()
        .delete(&admin_context(), "g1", "gallery/gone.jpg")
        .await
        .unwrap();
}

#[tokio::test]
async fn gallery_delete_fails_when_the_document_delete_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/portal-media/gallery/kept.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/gallery"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "permission denied"
        })))
        .mount(&mock_server)
        .await;

    let portal = portal(&mock_server.uri());
    let result = portal
        .gallery()
        .delete(&admin_context(), "g1", "gallery/kept.jpg")
        .await;

    assert!(result.is_err());
}
