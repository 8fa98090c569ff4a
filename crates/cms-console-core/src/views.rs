//! Summaries and filters behind the dashboard and moderation views.

use serde::Serialize;

use crate::models::{Comment, CommentStatus, Video, VideoStatus};

pub fn comments_with_status(comments: &[Comment], status: CommentStatus) -> Vec<&Comment> {
    comments.iter().filter(|c| c.status == status).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModerationCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl ModerationCounts {
    pub fn from_comments(comments: &[Comment]) -> Self {
        comments.iter().fold(Self::default(), |mut counts, c| {
            match c.status {
                CommentStatus::Pending => counts.pending += 1,
                CommentStatus::Approved => counts.approved += 1,
                CommentStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_videos: usize,
    pub published: usize,
    pub drafts: usize,
    pub archived: usize,
    pub featured: usize,
    pub total_views: u64,
    /// Title of the most viewed video, if any
    pub top_video: Option<String>,
}

impl DashboardSummary {
    pub fn from_videos(videos: &[Video]) -> Self {
        let mut summary = Self {
            total_videos: videos.len(),
            ..Self::default()
        };
        for video in videos {
            match video.status {
                VideoStatus::Published => summary.published += 1,
                VideoStatus::Draft => summary.drafts += 1,
                VideoStatus::Archived => summary.archived += 1,
            }
            if video.featured {
                summary.featured += 1;
            }
            summary.total_views += video.views;
        }
        summary.top_video = videos
            .iter()
            .max_by_key(|v| v.views)
            .map(|v| v.title.clone());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, status: CommentStatus) -> Comment {
        Comment {
            id,
            document_id: None,
            content: format!("comment {}", id),
            author: "Maria".to_string(),
            email: None,
            status,
            created_at: None,
        }
    }

    fn video(title: &str, views: u64, status: VideoStatus) -> Video {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": title,
            "views": views,
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_comments_with_status() {
        let comments = vec![
            comment(1, CommentStatus::Pending),
            comment(2, CommentStatus::Approved),
            comment(3, CommentStatus::Pending),
        ];
        let pending = comments_with_status(&comments, CommentStatus::Pending);
        assert_eq!(pending.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(comments_with_status(&comments, CommentStatus::Rejected).is_empty());
    }

    #[test]
    fn test_moderation_counts() {
        let comments = vec![
            comment(1, CommentStatus::Pending),
            comment(2, CommentStatus::Approved),
            comment(3, CommentStatus::Rejected),
            comment(4, CommentStatus::Pending),
        ];
        let counts = ModerationCounts::from_comments(&comments);
        assert_eq!(
            counts,
            ModerationCounts {
                pending: 2,
                approved: 1,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_dashboard_summary() {
        let videos = vec![
            video("Intro to React", 15400, VideoStatus::Published),
            video("CSS Grid Layout", 9800, VideoStatus::Published),
            video("JavaScript ES2024", 22100, VideoStatus::Draft),
        ];
        let summary = DashboardSummary::from_videos(&videos);
        assert_eq!(summary.total_videos, 3);
        assert_eq!(summary.published, 2);
        assert_eq!(summary.drafts, 1);
        assert_eq!(summary.total_views, 47300);
        assert_eq!(summary.top_video.as_deref(), Some("JavaScript ES2024"));
    }

    #[test]
    fn test_dashboard_summary_empty() {
        assert_eq!(DashboardSummary::from_videos(&[]), DashboardSummary::default());
    }
}
