//! Handler functions for persisted page data.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    database::{
        models::{BmiResult, CommunityPost, ContactMessage, LeaderboardEntry, Review},
        queries,
    },
    errors::AppError,
    services::bmi,
    state::AppState,
};

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn filled(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Deserialize)]
pub struct BmiInput {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

pub async fn latest_bmi(State(state): State<Arc<AppState>>) -> Json<Option<BmiResult>> {
    Json(queries::latest_bmi(&state.store).await)
}

pub async fn calculate_bmi(
    State(state): State<Arc<AppState>>,
    Json(input): Json<BmiInput>,
) -> Result<Json<BmiResult>, AppError> {
    let result = input
        .height_cm
        .zip(input.weight_kg)
        .and_then(|(height, weight)| bmi::calculate(height, weight))
        .ok_or_else(|| {
            AppError::MalformedPayload("Please enter valid height and weight values".into())
        })?;

    queries::save_bmi(&state.store, &result).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ScoreInput {
    pub name: String,
    pub score: u32,
}

pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntry>> {
    Json(queries::leaderboard(&state.store).await)
}

pub async fn record_score(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ScoreInput>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let name = filled(&input.name)
        .ok_or_else(|| AppError::MalformedPayload("Please enter your name.".into()))?;

    let entry = LeaderboardEntry {
        name,
        score: input.score,
        date: today(),
    };
    queries::record_score(&state.store, entry).await?;
    Ok(Json(queries::leaderboard(&state.store).await))
}

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub text: String,
}

pub async fn community_posts(State(state): State<Arc<AppState>>) -> Json<Vec<CommunityPost>> {
    Json(queries::community_posts(&state.store).await)
}

pub async fn add_post(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PostInput>,
) -> Result<Json<CommunityPost>, AppError> {
    let text = filled(&input.text)
        .ok_or_else(|| AppError::MalformedPayload("Message cannot be empty.".into()))?;
    let author = state
        .session
        .snapshot()
        .identity()
        .map_or_else(|| "Guest User".to_string(), |i| i.email.clone());

    let post = CommunityPost {
        text,
        author,
        date: today(),
    };
    queries::add_post(&state.store, post.clone()).await?;
    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub name: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub average_rating: String,
    pub reviews: Vec<Review>,
}

fn average_rating(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "0.0".to_string();
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    format!("{:.1}", f64::from(total) / reviews.len() as f64)
}

pub async fn reviews(State(state): State<Arc<AppState>>) -> Json<ReviewList> {
    let reviews = queries::reviews(&state.store).await;
    Json(ReviewList {
        average_rating: average_rating(&reviews),
        reviews,
    })
}

pub async fn add_review(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Review>, AppError> {
    let incomplete =
        || AppError::MalformedPayload("Please fill all fields and select a rating.".into());
    let name = filled(&input.name).ok_or_else(incomplete)?;
    let comment = filled(&input.comment).ok_or_else(incomplete)?;
    if !(1..=5).contains(&input.rating) {
        return Err(incomplete());
    }

    let review = Review {
        name,
        rating: input.rating,
        comment,
        date: today(),
    };
    queries::add_review(&state.store, review.clone()).await?;
    Ok(Json(review))
}

#[derive(Debug, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn contact(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ContactInput>,
) -> Result<Json<ContactMessage>, AppError> {
    let incomplete = || AppError::MalformedPayload("Please fill all fields.".into());
    let message = ContactMessage {
        name: filled(&input.name).ok_or_else(incomplete)?,
        email: filled(&input.email).ok_or_else(incomplete)?,
        message: filled(&input.message).ok_or_else(incomplete)?,
        date: Utc::now().to_rfc3339(),
    };

    queries::add_contact_message(&state.store, message.clone()).await?;
    Ok(Json(message))
}
