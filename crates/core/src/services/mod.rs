//! Business logic services.
//!
//! Services own a handle to the connection pool, open one transaction per
//! write, and return [`views`](crate::views) rather than entity models.

#![allow(missing_docs)]

mod catalog;
mod category;
mod feedback;
mod fields;
mod guide;
mod media;

pub use catalog::CatalogService;
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use feedback::{FeedbackService, SubmitFeedbackInput};
pub use guide::{CreateGuideInput, GuideService, MAX_CATEGORIES_PER_GUIDE, UpdateGuideInput};
pub use media::{CreateMediaInput, MediaService, UpdateMediaInput, UploadMediaInput};
