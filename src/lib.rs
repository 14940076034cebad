//! mentor-match: mentorship wizard with AI-generated mentor recommendations.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod llm;
pub mod model;
pub mod wizard;
