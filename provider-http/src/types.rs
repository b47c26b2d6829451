//! Wire payload types for the video generation API

use bridge_traits::backend::ProjectSnapshot;
use serde::Deserialize;

/// Response envelope for the bulk project listing
#[derive(Debug, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectSnapshot>,
}

/// Response carrying a one-shot signed upload URL
#[derive(Debug, Deserialize)]
pub struct UploadUrlResponse {
    pub url: String,
}

/// Response carrying a fresh signed playback URL
#[derive(Debug, Deserialize)]
pub struct VideoUrlResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::backend::ProjectStatus;

    #[test]
    fn test_projects_response_parses_snapshots() {
        let json = r#"{
            "projects": [
                {"_id": "p1", "status": "processing"},
                {"_id": "p2", "status": "ready", "videoUrl": "https://cdn.example/v.mp4"}
            ]
        }"#;

        let response: ProjectsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.projects.len(), 2);
        assert_eq!(response.projects[0].status, ProjectStatus::Processing);
        assert_eq!(
            response.projects[1].video_url.as_deref(),
            Some("https://cdn.example/v.mp4")
        );
    }
}
