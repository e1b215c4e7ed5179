//! Module for the data the pages persist: BMI results, quiz scores,
//! community posts, reviews and contact messages.
//!
//! Every path here sits beneath its page's view path, so the route guard
//! protects it exactly like the page itself.

pub mod handlers;
pub mod routes;
