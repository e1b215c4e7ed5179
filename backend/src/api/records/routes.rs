//! Routes for persisted page data, each under the view it belongs to.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_post, add_review, calculate_bmi, community_posts, contact, latest_bmi, leaderboard,
    record_score, reviews,
};
use crate::state::AppState;

pub fn records_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bmi/result", get(latest_bmi).post(calculate_bmi))
        .route("/quiz/leaderboard", get(leaderboard).post(record_score))
        .route("/community/leaderboard", get(leaderboard))
        .route("/community/posts", get(community_posts).post(add_post))
        .route("/feedback/reviews", get(reviews).post(add_review))
        .route("/about/contact", post(contact))
}
