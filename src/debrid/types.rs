//! Debrid API payloads and failure modes.

use reqwest::StatusCode;
use serde::Deserialize;

/// Why a conversion could not produce a playback URL.
///
/// These never leave the debrid client; they are logged and the source falls
/// back to its raw form.
#[derive(Debug, thiserror::Error)]
pub enum DebridError {
    #[error("credential rejected by {endpoint} ({status})")]
    Unauthorized {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("malformed {endpoint} response: {message}")]
    Malformed {
        endpoint: &'static str,
        message: String,
    },

    #[error("job {job_id} ended with status {status}")]
    JobFailed { job_id: String, status: String },

    #[error("job {job_id} not ready after {attempts} polls")]
    Timeout { job_id: String, attempts: u32 },

    #[error("job {job_id} produced no links")]
    NoLinks { job_id: String },
}

/// Response to `POST /torrents/addMagnet`.
#[derive(Debug, Deserialize)]
pub struct AddMagnetResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response to `GET /torrents/info/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentInfo {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Response to `POST /unrestrict/link`.
#[derive(Debug, Deserialize)]
pub struct UnrestrictResponse {
    #[serde(default)]
    pub download: Option<String>,
}

/// Coarse classification of a job status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Files are available for unrestricting.
    Ready,
    /// The job can never complete.
    Failed,
    /// Still converting, queued, or downloading.
    Pending,
}

impl JobStatus {
    pub fn classify(status: &str) -> Self {
        match status {
            "downloaded" | "ready" => JobStatus::Ready,
            "error" | "dead" | "magnet_error" | "virus" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_statuses() {
        assert_eq!(JobStatus::classify("downloaded"), JobStatus::Ready);
        assert_eq!(JobStatus::classify("ready"), JobStatus::Ready);
        for failed in ["error", "dead", "magnet_error", "virus"] {
            assert_eq!(JobStatus::classify(failed), JobStatus::Failed);
        }
        for pending in ["queued", "downloading", "magnet_conversion", "waiting_files_selection"] {
            assert_eq!(JobStatus::classify(pending), JobStatus::Pending);
        }
    }

    #[test]
    fn info_tolerates_missing_links() {
        let info: TorrentInfo = serde_json::from_str(r#"{"id":"J1","status":"queued"}"#).unwrap();
        assert!(info.links.is_empty());
        assert_eq!(info.status, "queued");
    }

    #[test]
    fn payloads_keep_only_used_fields() {
        let added: AddMagnetResponse =
            serde_json::from_str(r#"{"id":"J1","uri":"https://rd/torrents/info/J1"}"#).unwrap();
        assert_eq!(added.id.as_deref(), Some("J1"));

        let link: UnrestrictResponse =
            serde_json::from_str(r#"{"download":"https://dl/file.mkv","filename":"file.mkv"}"#)
                .unwrap();
        assert_eq!(link.download.as_deref(), Some("https://dl/file.mkv"));
    }
}
