//! Handler functions for page views.

use std::sync::Arc;

use adapters::Role;
use axum::{
    extract::{OriginalUri, State},
    Json,
};
use serde::Serialize;

use crate::{errors::AppError, state::AppState};

struct PageContent {
    path: &'static str,
    heading: &'static str,
    summary: &'static str,
}

const PAGES: &[PageContent] = &[
    PageContent {
        path: "/",
        heading: "Healthy You",
        summary: "Eat smart, live strong: tools and guides for everyday nutrition.",
    },
    PageContent {
        path: "/about",
        heading: "About Healthy You",
        summary: "Who we are, why nutrition education matters, and how to reach us.",
    },
    PageContent {
        path: "/auth",
        heading: "Sign In",
        summary: "Sign in or create an account to unlock the interactive tools.",
    },
    PageContent {
        path: "/videos",
        heading: "Video Gallery",
        summary: "Short videos on food safety, balanced diets and healthy habits.",
    },
    PageContent {
        path: "/lifestyle-diseases",
        heading: "Lifestyle Diseases",
        summary: "How diet and habits relate to common lifestyle diseases.",
    },
    PageContent {
        path: "/seasonal",
        heading: "Seasonal Recommendations",
        summary: "Foods and fruits suited to winter, summer and the rainy season.",
    },
    PageContent {
        path: "/bmi",
        heading: "BMI Calculator",
        summary: "Calculate your Body Mass Index and get personalized health insights.",
    },
    PageContent {
        path: "/quiz",
        heading: "Nutrition Quiz",
        summary: "Test your nutrition knowledge against the clock.",
    },
    PageContent {
        path: "/diet",
        heading: "Diet Guide",
        summary: "Explore the food groups and build a balanced plate.",
    },
    PageContent {
        path: "/community",
        heading: "Community",
        summary: "Share tips with other members and see the quiz leaderboard.",
    },
    PageContent {
        path: "/food-adulteration",
        heading: "Food Safety",
        summary: "Simple home tests to detect common food adulterants.",
    },
    PageContent {
        path: "/mentor",
        heading: "Your Personal Health Mentor",
        summary: "Choose your goal and get a 7-day plan with meals, exercises and daily tips.",
    },
    PageContent {
        path: "/feedback",
        heading: "Feedback",
        summary: "Rate your experience and read what others think.",
    },
];

#[derive(Debug, Serialize)]
pub struct PageView {
    pub path: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub summary: &'static str,
    pub requires_auth: bool,
    pub required_role: Option<Role>,
}

pub async fn render_page(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<PageView>, AppError> {
    let path = uri.path();
    let requirement = state
        .routes
        .get(path)
        .ok_or_else(|| AppError::NotFound(path.to_string()))?;
    let content = PAGES
        .iter()
        .find(|page| page.path == requirement.path)
        .ok_or_else(|| AppError::NotFound(path.to_string()))?;

    Ok(Json(PageView {
        path: requirement.path,
        title: requirement.title,
        heading: content.heading,
        summary: content.summary,
        requires_auth: requirement.requires_auth,
        required_role: requirement.required_role,
    }))
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
