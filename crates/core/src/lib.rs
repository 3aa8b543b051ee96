//! Core business logic for the help center backend.

pub mod body;
pub mod services;
pub mod views;

pub use body::{Block, GuideBody};
pub use services::*;
pub use views::{
    CategoryNode, CategoryView, FeedbackView, GuideNode, GuideView, MediaNode, MediaView,
};
