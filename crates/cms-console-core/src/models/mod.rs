//! Data models for backend content types.
//!
//! Records deserialize from the backend's camelCase JSON and tolerate
//! fields the backend leaves out or that a content type has not populated.

pub mod comment;
pub mod content;
pub mod envelope;
pub mod site;
pub mod user;

pub use comment::{Comment, CommentStatus, ModerationDecision};
pub use content::{Category, Media, Playlist, Tag, Video, VideoStatus};
pub use envelope::{Envelope, Meta, Pagination};
pub use site::{AnalyticsStats, SeoSettings, Settings, SocialLinks, Subscription, ViewsPeriod};
pub use user::{Role, User};
