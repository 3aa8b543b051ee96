//! Database entities.

pub mod category;
pub mod feedback;
pub mod guide_category_link;
pub mod guide_media_link;
pub mod media;
pub mod user_guide;

pub use category::Entity as Category;
pub use feedback::Entity as Feedback;
pub use guide_category_link::Entity as GuideCategoryLink;
pub use guide_media_link::Entity as GuideMediaLink;
pub use media::Entity as Media;
pub use user_guide::Entity as UserGuide;
