//! End-to-end behaviour of the `/api` resource over the in-memory adapters.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::Value;

use support::{
    MEDIA_BASE_URL, account_request, body_json, get_request, harness, harness_with_upload_cap,
    init_app, multipart_body, session_cookie, upload_request,
};

const PASSWORD: &str = "correct-horse";

#[rstest]
#[actix_web::test]
async fn registration_rejects_duplicates_and_never_echoes_the_password() {
    let h = harness();
    let app = init_app(h.state.clone()).await;

    let res = test::call_service(
        &app,
        account_request("register", "Ada@Example.com", "ada_l", PASSWORD),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_none(), "register must not log in");
    let body = body_json(res).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["username"], "ada_l");
    let raw = body.to_string();
    assert!(!raw.contains(PASSWORD));
    assert!(!raw.to_lowercase().contains("password"));

    for (email, username) in [("ada@example.com", "someone"), ("other@example.com", "ada_l")] {
        let res =
            test::call_service(&app, account_request("register", email, username, PASSWORD)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["message"], "User exists");
    }
}

#[rstest]
#[case("ada@example.com", "wrong-password")]
#[case("nobody@example.com", PASSWORD)]
#[actix_web::test]
async fn login_failures_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    test::call_service(&app, account_request("register", "ada@example.com", "ada_l", PASSWORD))
        .await;

    let res = test::call_service(&app, account_request("login", email, "", password)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
    let body = body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Invalid credentials");
}

#[rstest]
#[case("/api?type=like&videoId=3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("/api?type=comment&videoId=3fa85f64-5717-4562-b3fc-2c963f66afa6&text=hi")]
#[case("/api?type=session")]
#[actix_web::test]
async fn protected_operations_need_a_session(#[case] uri: &str) {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    let res = test::call_service(&app, get_request(uri, None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn upload_needs_a_session() {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    let body = multipart_body(Some(("a.mp4", "video/mp4", b"frames")), &[]);
    let res = test::call_service(&app, upload_request(None, body)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("/api?type=nonsense")]
#[case("/api")]
#[case("/api?type=upload")]
#[actix_web::test]
async fn unknown_types_are_rejected(#[case] uri: &str) {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    let res = test::call_service(&app, get_request(uri, None)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], "Invalid request type");
}

#[rstest]
#[actix_web::test]
async fn full_session_upload_feed_and_engagement_flow() {
    let h = harness();
    let app = init_app(h.state.clone()).await;

    test::call_service(&app, account_request("register", "ada@example.com", "ada_l", PASSWORD))
        .await;
    let res = test::call_service(&app, account_request("login", "ada@example.com", "", PASSWORD))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie");
    let user_id = body_json(res).await["user"]["id"]
        .as_str()
        .expect("user id")
        .to_owned();

    let res = test::call_service(&app, get_request("/api?type=session", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["user"]["id"], user_id.as_str());

    let uploads = [
        ("first.mp4", "dance", r##"["#Dance", "fun"]"##),
        ("second.mp4", "comedy", r##"["fun"]"##),
        ("third.webm", "dance", r#"[]"#),
    ];
    let mut video_ids = Vec::new();
    for (file_name, category, hashtags) in uploads {
        let content_type = if file_name.ends_with(".webm") {
            "video/webm"
        } else {
            "video/mp4"
        };
        let body = multipart_body(
            Some((file_name, content_type, b"frames")),
            &[
                ("description", "a clip"),
                ("category", category),
                ("hashtags", hashtags),
            ],
        );
        let res = test::call_service(&app, upload_request(Some(&cookie), body)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let video = body_json(res).await;
        assert_eq!(video["userId"], user_id.as_str());
        let url = video["url"].as_str().expect("url");
        assert!(url.starts_with(MEDIA_BASE_URL));
        let key = url
            .strip_prefix(MEDIA_BASE_URL)
            .expect("prefix")
            .trim_start_matches('/');
        assert!(h.media.path().join(key).is_file(), "stored file {key}");
        video_ids.push(video["id"].as_str().expect("video id").to_owned());
    }

    let res = test::call_service(&app, get_request("/api?type=feed", None)).await;
    let feed = body_json(res).await;
    let ids: Vec<&str> = feed
        .as_array()
        .expect("feed array")
        .iter()
        .filter_map(|entry| entry["id"].as_str())
        .collect();
    let newest_first: Vec<&str> = video_ids.iter().rev().map(String::as_str).collect();
    assert_eq!(ids, newest_first);
    assert_eq!(feed[0]["user"]["username"], "ada_l");

    let res = test::call_service(&app, get_request("/api?type=feed&hashtag=%23DANCE", None)).await;
    let tagged = body_json(res).await;
    assert_eq!(tagged.as_array().map(Vec::len), Some(1));
    assert_eq!(tagged[0]["id"], video_ids[0].as_str());

    let res = test::call_service(&app, get_request("/api?type=feed&category=comedy", None)).await;
    let comedy = body_json(res).await;
    assert_eq!(comedy.as_array().map(Vec::len), Some(1));
    assert_eq!(comedy[0]["id"], video_ids[1].as_str());

    let like_uri = format!("/api?type=like&videoId={}", video_ids[0]);
    let res = test::call_service(&app, get_request(&like_uri, Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = test::call_service(&app, get_request(&like_uri, Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let comment_uri = format!(
        "/api?type=comment&videoId={}&text=%20nice%20moves%20",
        video_ids[0]
    );
    let res = test::call_service(&app, get_request(&comment_uri, Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["text"], "nice moves");

    let res = test::call_service(&app, get_request("/api?type=feed&hashtag=dance", None)).await;
    let entry = body_json(res).await[0].clone();
    assert_eq!(entry["likes"].as_array().map(Vec::len), Some(1));
    assert_eq!(entry["comments"][0]["text"], "nice moves");

    let res = test::call_service(&app, get_request("/api?type=categories", None)).await;
    let categories = body_json(res).await;
    assert_eq!(categories[0]["category"], "dance");
    assert_eq!(categories[0]["count"], 2);
    assert_eq!(categories[1]["category"], "comedy");

    let res = test::call_service(&app, get_request("/api?type=trending-hashtags", None)).await;
    let trending = body_json(res).await;
    assert_eq!(trending[0]["name"], "fun");
    assert_eq!(trending[0]["videoCount"], 2);
    assert_eq!(trending[1]["name"], "dance");

    let logout = test::TestRequest::post()
        .uri("/api")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "type": "logout" }))
        .to_request();
    let res = test::call_service(&app, logout).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res).expect("removal cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(body_json(res).await, serde_json::json!({ "success": true }));
}

#[rstest]
#[actix_web::test]
async fn feed_and_trending_are_capped() {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    test::call_service(&app, account_request("register", "ada@example.com", "ada_l", PASSWORD))
        .await;
    let res = test::call_service(&app, account_request("login", "ada@example.com", "", PASSWORD))
        .await;
    let cookie = session_cookie(&res).expect("session cookie");

    for index in 0..22 {
        let tags = format!(r#"["tag{index}"]"#);
        let body = multipart_body(
            Some(("clip.mp4", "video/mp4", b"frames")),
            &[("hashtags", tags.as_str())],
        );
        let res = test::call_service(&app, upload_request(Some(&cookie), body)).await;
        assert_eq!(res.status(), StatusCode::OK, "upload {index}");
    }

    let count = |value: Value| value.as_array().map(Vec::len);
    let res = test::call_service(&app, get_request("/api?type=feed", None)).await;
    assert_eq!(count(body_json(res).await), Some(20));
    let res = test::call_service(&app, get_request("/api?type=trending-hashtags", None)).await;
    assert_eq!(count(body_json(res).await), Some(10));
    let res = test::call_service(&app, get_request("/api?type=recommended&limit=500", None)).await;
    assert_eq!(count(body_json(res).await), Some(22));
}

#[rstest]
#[actix_web::test]
async fn rejected_uploads_leave_no_video_behind() {
    let h = harness();
    let app = init_app(h.state.clone()).await;
    test::call_service(&app, account_request("register", "ada@example.com", "ada_l", PASSWORD))
        .await;
    let res = test::call_service(&app, account_request("login", "ada@example.com", "", PASSWORD))
        .await;
    let cookie = session_cookie(&res).expect("session cookie");

    let not_video = multipart_body(Some(("notes.txt", "text/plain", b"hello")), &[]);
    let res = test::call_service(&app, upload_request(Some(&cookie), not_video)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let bad_tags = multipart_body(
        Some(("clip.mp4", "video/mp4", b"frames")),
        &[("hashtags", "not json")],
    );
    let res = test::call_service(&app, upload_request(Some(&cookie), bad_tags)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"]["field"], "hashtags");

    let res = test::call_service(&app, get_request("/api?type=feed", None)).await;
    assert_eq!(body_json(res).await, serde_json::json!([]));
}

fn stored_files(media: &std::path::Path) -> usize {
    std::fs::read_dir(media)
        .expect("media dir")
        .filter_map(Result::ok)
        .map(|entry| {
            std::fs::read_dir(entry.path())
                .map(|files| files.count())
                .unwrap_or(0)
        })
        .sum()
}

#[rstest]
#[case(1024, StatusCode::OK)]
#[case(1025, StatusCode::PAYLOAD_TOO_LARGE)]
#[actix_web::test]
async fn video_parts_over_the_cap_are_refused_while_streaming(
    #[case] size: usize,
    #[case] expected: StatusCode,
) {
    let h = harness_with_upload_cap(1024);
    let app = init_app(h.state.clone()).await;
    test::call_service(&app, account_request("register", "ada@example.com", "ada_l", PASSWORD))
        .await;
    let res = test::call_service(&app, account_request("login", "ada@example.com", "", PASSWORD))
        .await;
    let cookie = session_cookie(&res).expect("session cookie");

    let frames = vec![0_u8; size];
    let body = multipart_body(Some(("clip.mp4", "video/mp4", &frames)), &[("category", "dance")]);
    let res = test::call_service(&app, upload_request(Some(&cookie), body)).await;
    assert_eq!(res.status(), expected);

    let feed = test::call_service(&app, get_request("/api?type=feed", None)).await;
    let listed = body_json(feed).await.as_array().map_or(0, Vec::len);
    if expected == StatusCode::OK {
        assert_eq!(listed, 1);
        assert_eq!(stored_files(h.media.path()), 1);
    } else {
        let body = body_json(res).await;
        assert_eq!(body["code"], "payload_too_large");
        assert_eq!(body["details"]["maxBytes"], 1024);
        assert_eq!(listed, 0);
        assert_eq!(stored_files(h.media.path()), 0);
    }
}
