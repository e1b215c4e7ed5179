//! Central module for organizing the application's page and data endpoints.
//!
//! Views render the pages of the route table, records serve the data those
//! pages persist, and user covers the signed-in account and navigation.
//! Sign-in itself is handled separately under `auth`.

pub mod records;
pub mod user;
pub mod views;
