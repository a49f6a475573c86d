//! Real-Debrid REST client.
//!
//! Converts an info hash into a direct playback URL:
//!
//! 1. `GET /user` -- optional credential check.
//! 2. `POST /torrents/addMagnet` -- register the hash, yielding a job id.
//! 3. `POST /torrents/selectFiles/{id}` -- include every file.
//! 4. `GET /torrents/info/{id}` -- poll at a fixed interval until the job is
//!    ready, failed, or the attempt budget runs out.
//! 5. `POST /unrestrict/link` -- turn the first produced link into a
//!    download URL.
//!
//! Any stage failure ends the conversion; it is logged and reported as
//! unavailable rather than returned as an error.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::DebridConfig;

use super::types::{AddMagnetResponse, DebridError, JobStatus, TorrentInfo, UnrestrictResponse};
use super::Converter;

/// Where a polled job ended up.
#[derive(Debug)]
enum PollOutcome {
    Ready(TorrentInfo),
    Failed(String),
    TimedOut,
}

pub struct RealDebridClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    verify_credential: bool,
    poll_interval: Duration,
    max_poll_attempts: u32,
    rate_limiter: DefaultDirectRateLimiter,
}

impl RealDebridClient {
    /// Create a client using `api_key` and the remaining settings from `config`.
    pub fn new(config: &DebridConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_minute(per_minute));

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            verify_credential: config.verify_credential,
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.max_poll_attempts.max(1),
            rate_limiter,
        }
    }

    /// Build a client from config, or `None` when no credential is configured.
    pub fn from_config(config: &DebridConfig) -> Option<Self> {
        config.credential().map(|key| Self::new(config, key))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Rate-limit, authenticate, send, and check the status of a request.
    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, DebridError> {
        self.rate_limiter.until_ready().await;

        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|source| DebridError::Http { endpoint, source })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DebridError::Unauthorized { endpoint, status });
        }
        if !status.is_success() {
            return Err(DebridError::Status { endpoint, status });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, DebridError> {
        response.json().await.map_err(|e| DebridError::Malformed {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Check that the provider accepts the stored credential.
    pub async fn verify(&self) -> Result<(), DebridError> {
        self.send("user", self.client.get(self.url("/user"))).await?;
        Ok(())
    }

    async fn submit(&self, info_hash: &str) -> Result<String, DebridError> {
        let magnet = format!("magnet:?xt=urn:btih:{info_hash}");
        let request = self
            .client
            .post(self.url("/torrents/addMagnet"))
            .form(&[("magnet", magnet.as_str())]);
        let response = self.send("addMagnet", request).await?;
        let added: AddMagnetResponse = Self::json("addMagnet", response).await?;

        added
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DebridError::Malformed {
                endpoint: "addMagnet",
                message: "missing job id".to_string(),
            })
    }

    async fn select_files(&self, job_id: &str) -> Result<(), DebridError> {
        let request = self
            .client
            .post(self.url(&format!("/torrents/selectFiles/{job_id}")))
            .form(&[("files", "all")]);
        self.send("selectFiles", request).await?;
        Ok(())
    }

    async fn job_info(&self, job_id: &str) -> Result<TorrentInfo, DebridError> {
        let request = self
            .client
            .get(self.url(&format!("/torrents/info/{job_id}")));
        let response = self.send("info", request).await?;
        Self::json("info", response).await
    }

    /// Poll the job until it reaches a terminal status or the budget is spent.
    ///
    /// Query errors are logged and count as a used attempt.
    async fn poll(&self, job_id: &str) -> PollOutcome {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.job_info(job_id).await {
                Ok(info) => match JobStatus::classify(&info.status) {
                    JobStatus::Ready => return PollOutcome::Ready(info),
                    JobStatus::Failed => return PollOutcome::Failed(info.status),
                    JobStatus::Pending => debug!(
                        job_id,
                        attempt,
                        status = %info.status,
                        progress = ?info.progress,
                        "Debrid job pending"
                    ),
                },
                Err(e) => warn!(job_id, attempt, error = %e, "Debrid status query failed"),
            }

            if attempt >= self.max_poll_attempts {
                return PollOutcome::TimedOut;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn unrestrict(&self, link: &str) -> Result<String, DebridError> {
        let request = self
            .client
            .post(self.url("/unrestrict/link"))
            .form(&[("link", link)]);
        let response = self.send("unrestrict", request).await?;
        let unrestricted: UnrestrictResponse = Self::json("unrestrict", response).await?;

        unrestricted
            .download
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DebridError::Malformed {
                endpoint: "unrestrict",
                message: "missing download url".to_string(),
            })
    }

    /// Run every stage for one hash.
    pub async fn try_convert(&self, info_hash: &str) -> Result<String, DebridError> {
        let info_hash = info_hash.to_ascii_lowercase();

        if self.verify_credential {
            self.verify().await?;
        }

        let job_id = self.submit(&info_hash).await?;
        debug!(hash = %info_hash, job_id = %job_id, "Debrid job submitted");

        // The job id is spent from here on; failures do not resubmit.
        self.select_files(&job_id).await?;

        let info = match self.poll(&job_id).await {
            PollOutcome::Ready(info) => info,
            PollOutcome::Failed(status) => return Err(DebridError::JobFailed { job_id, status }),
            PollOutcome::TimedOut => {
                return Err(DebridError::Timeout {
                    job_id,
                    attempts: self.max_poll_attempts,
                })
            }
        };

        let link = info
            .links
            .into_iter()
            .next()
            .ok_or(DebridError::NoLinks { job_id })?;

        self.unrestrict(&link).await
    }
}

#[async_trait]
impl Converter for RealDebridClient {
    fn label(&self) -> &'static str {
        "RD"
    }

    async fn convert(&self, info_hash: &str) -> Option<String> {
        match self.try_convert(info_hash).await {
            Ok(url) => {
                info!(hash = %info_hash, "Debrid conversion ready");
                Some(url)
            }
            Err(e) => {
                warn!(hash = %info_hash, error = %e, "Debrid conversion unavailable");
                None
            }
        }
    }
}
