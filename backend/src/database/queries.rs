//! Typed access to each persisted blob.
//!
//! Lists grow without bound; nothing is ever pruned or migrated.

use super::{
    models::{BmiResult, CommunityPost, ContactMessage, LeaderboardEntry, Review},
    DatabaseError, JsonStore,
};

pub const BMI_RESULT: &str = "bmiResult";
pub const QUIZ_LEADERBOARD: &str = "quizLeaderboard";
pub const COMMUNITY_POSTS: &str = "communityPosts";
pub const USER_REVIEWS: &str = "userReviews";
pub const CONTACT_MESSAGES: &str = "contactMessages";

pub async fn latest_bmi(store: &JsonStore) -> Option<BmiResult> {
    store.read(BMI_RESULT).await
}

pub async fn save_bmi(store: &JsonStore, result: &BmiResult) -> Result<(), DatabaseError> {
    store.write(BMI_RESULT, &Some(result)).await
}

/// Highest score first; equal scores keep insertion order.
pub async fn leaderboard(store: &JsonStore) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = store.read(QUIZ_LEADERBOARD).await;
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

pub async fn record_score(store: &JsonStore, entry: LeaderboardEntry) -> Result<(), DatabaseError> {
    store
        .update(QUIZ_LEADERBOARD, |entries: &mut Vec<LeaderboardEntry>| {
            entries.push(entry)
        })
        .await
}

pub async fn community_posts(store: &JsonStore) -> Vec<CommunityPost> {
    store.read(COMMUNITY_POSTS).await
}

pub async fn add_post(store: &JsonStore, post: CommunityPost) -> Result<(), DatabaseError> {
    store
        .update(COMMUNITY_POSTS, |posts: &mut Vec<CommunityPost>| {
            posts.insert(0, post)
        })
        .await
}

pub async fn reviews(store: &JsonStore) -> Vec<Review> {
    store.read(USER_REVIEWS).await
}

pub async fn add_review(store: &JsonStore, review: Review) -> Result<(), DatabaseError> {
    store
        .update(USER_REVIEWS, |reviews: &mut Vec<Review>| {
            reviews.insert(0, review)
        })
        .await
}

pub async fn add_contact_message(
    store: &JsonStore,
    message: ContactMessage,
) -> Result<(), DatabaseError> {
    store
        .update(CONTACT_MESSAGES, |messages: &mut Vec<ContactMessage>| {
            messages.push(message)
        })
        .await
}
