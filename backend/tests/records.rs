mod common;

use axum::http::StatusCode;
use common::ready_app;
use serde_json::json;

#[tokio::test]
async fn bmi_results_are_calculated_and_kept() {
    let app = ready_app().await;
    app.register("ada@example.com").await;
    app.sign_in("ada@example.com").await;

    assert_eq!(app.get("/bmi/result").await.body, json!(null));

    let result = app
        .post("/bmi/result", json!({ "height_cm": 175.0, "weight_kg": 70.0 }))
        .await;
    assert_eq!(result.status, StatusCode::OK);
    assert_eq!(result.body["bmi"], json!(22.9));
    assert_eq!(result.body["category"], "Normal Weight");

    let latest = app.get("/bmi/result").await;
    assert_eq!(latest.body, result.body);

    let invalid = app
        .post("/bmi/result", json!({ "height_cm": 0.0, "weight_kg": 70.0 }))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        invalid.body["error"],
        "Please enter valid height and weight values"
    );
}

#[tokio::test]
async fn records_share_their_view_guard() {
    let app = ready_app().await;

    let post = app
        .post("/community/posts", json!({ "text": "eat greens" }))
        .await;
    assert_eq!(post.status, StatusCode::SEE_OTHER);

    let contact = app
        .post(
            "/about/contact",
            json!({ "name": "Ada", "email": "ada@example.com", "message": "hello" }),
        )
        .await;
    assert_eq!(contact.status, StatusCode::OK);
    assert_eq!(contact.body["name"], "Ada");
}

#[tokio::test]
async fn community_posts_are_signed_by_the_session() {
    let app = ready_app().await;
    app.register("ada@example.com").await;
    app.sign_in("ada@example.com").await;

    app.post("/community/posts", json!({ "text": "first" })).await;
    let second = app
        .post("/community/posts", json!({ "text": "  second  " }))
        .await;
    assert_eq!(second.body["author"], "ada@example.com");
    assert_eq!(second.body["text"], "second");

    let posts = app.get("/community/posts").await;
    let texts: Vec<_> = posts
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["second", "first"]);

    let empty = app.post("/community/posts", json!({ "text": " " })).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quiz_scores_feed_both_leaderboards() {
    let app = ready_app().await;
    app.register("ada@example.com").await;
    app.sign_in("ada@example.com").await;

    app.post("/quiz/leaderboard", json!({ "name": "Ada", "score": 3 }))
        .await;
    let board = app
        .post("/quiz/leaderboard", json!({ "name": "Grace", "score": 5 }))
        .await;
    assert_eq!(board.body[0]["name"], "Grace");
    assert_eq!(board.body[1]["name"], "Ada");

    let community = app.get("/community/leaderboard").await;
    assert_eq!(community.body, board.body);
}

#[tokio::test]
async fn reviews_need_a_rating_and_report_the_average() {
    let app = ready_app().await;
    app.register("ada@example.com").await;
    app.sign_in("ada@example.com").await;

    let unrated = app
        .post(
            "/feedback/reviews",
            json!({ "name": "Ada", "rating": 0, "comment": "nice" }),
        )
        .await;
    assert_eq!(unrated.status, StatusCode::BAD_REQUEST);

    for rating in [5, 4] {
        let review = app
            .post(
                "/feedback/reviews",
                json!({ "name": "Ada", "rating": rating, "comment": "nice" }),
            )
            .await;
        assert_eq!(review.status, StatusCode::OK);
    }

    let list = app.get("/feedback/reviews").await;
    assert_eq!(list.body["average_rating"], "4.5");
    assert_eq!(list.body["reviews"].as_array().unwrap().len(), 2);
}
