//! Leaderboard - Best-effort score service client
//!
//! Talks to the external leaderboard HTTP service. Every request
//! carries a short timeout and every failure degrades to an absent
//! value; a dead service never touches the simulation loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Used when `LEADERBOARD_API_URL` is not set
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Timeout for every leaderboard request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("service rejected the request")]
    Rejected,
}

/// One row of the top-10 board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: f64,
    pub distance: f64,
    #[serde(default)]
    pub max_speed: f64,
}

/// Response from the leaderboard endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardResponse {
    success: bool,
    #[serde(default)]
    leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    total_players: u32,
}

/// What the leaderboard screen renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub total_players: u32,
}

/// Service-wide statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    #[serde(default)]
    pub total_players: u32,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub highest_score: f64,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub longest_distance: f64,
    #[serde(default)]
    pub fastest_speed: f64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    success: bool,
    stats: Option<GlobalStats>,
}

/// Body posted when a run finishes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: f64,
    pub distance: f64,
    pub max_speed: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    success: bool,
    rank: Option<u32>,
    #[serde(default)]
    total_players: u32,
}

/// Where the submitted run landed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub rank: Option<u32>,
    pub total_players: u32,
}

/// HTTP client for the leaderboard service
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl LeaderboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("http client built without timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Base URL from `LEADERBOARD_API_URL`, or the local default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("LEADERBOARD_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Top-10 board plus the total player count.
    pub async fn fetch_leaderboard(&self) -> Result<LeaderboardView, LeaderboardError> {
        let url = format!("{}/api/leaderboard", self.base_url);
        let response: LeaderboardResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(LeaderboardError::Rejected);
        }
        Ok(LeaderboardView {
            entries: response.leaderboard,
            total_players: response.total_players,
        })
    }

    /// Service-wide statistics for the leaderboard screen footer.
    pub async fn fetch_stats(&self) -> Result<GlobalStats, LeaderboardError> {
        let url = format!("{}/api/stats", self.base_url);
        let response: StatsResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(LeaderboardError::Rejected);
        }
        Ok(response.stats.unwrap_or_default())
    }

    /// Submit a finished run and learn its rank.
    pub async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let url = format!("{}/api/submit-score", self.base_url);
        let response: SubmitResponse = self
            .http
            .post(&url)
            .json(submission)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(LeaderboardError::Rejected);
        }
        Ok(SubmitOutcome {
            rank: response.rank,
            total_players: response.total_players,
        })
    }
}
