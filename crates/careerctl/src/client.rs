//! HTTP client for talking to careerd.
//!
//! Every API response arrives in the `{"success": ..., "data"/"message": ...}`
//! envelope; [`CareerdClient`] unwraps it and surfaces the daemon's message as
//! the error text. `/healthz` is the one bare endpoint.

use anyhow::{anyhow, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use career_common::{
    Career, CareerStep, CareerSummary, HealthResponse, ProgressOverview, StepOverview, SyncReport,
};

use crate::cli::Cli;

pub const DEFAULT_URL: &str = "http://127.0.0.1:7870";

/// Client for the careerd HTTP API.
pub struct CareerdClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    user_id: i64,
    admin: bool,
}

impl CareerdClient {
    pub fn new(base_url: String, token: Option<String>, user_id: i64, admin: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
            user_id,
            admin,
        }
    }

    /// Resolve connection settings from flags, then env, then defaults.
    pub fn from_cli(cli: &Cli) -> Self {
        let base_url = cli
            .url
            .clone()
            .or_else(|| std::env::var("CAREERD_URL").ok())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let token = cli
            .token
            .clone()
            .or_else(|| std::env::var("CAREERD_TOKEN").ok());

        Self::new(base_url, token, cli.user_id.unwrap_or(0), cli.admin)
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let mut request = self
            .http
            .request(method, &url)
            .header("X-User-Id", self.user_id.to_string())
            .header("X-User-Role", if self.admin { "admin" } else { "user" });
        if let Some(token) = &self.token {
            if !token.is_empty() {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Cannot reach careerd at {}: {}", self.base_url, e))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Invalid daemon response: {}", e))?;
        unwrap_envelope(status, body)
    }

    pub async fn list_careers(&self) -> Result<ProgressOverview> {
        let data = self.send(Method::GET, "/api/v1/career", None).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn create_career(&self, payload: &Value) -> Result<Career> {
        let data = self
            .send(Method::POST, "/api/v1/career", Some(payload))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn update_career(&self, career_id: i64, payload: &Value) -> Result<Career> {
        let data = self
            .send(
                Method::PUT,
                &format!("/api/v1/career/{}", career_id),
                Some(payload),
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn delete_career(&self, career_id: i64) -> Result<Value> {
        self.send(
            Method::DELETE,
            &format!("/api/v1/career/{}", career_id),
            None,
        )
        .await
    }

    pub async fn list_steps(&self, career_id: i64) -> Result<Vec<StepOverview>> {
        let data = self
            .send(
                Method::GET,
                &format!("/api/v1/career/steps/{}", career_id),
                None,
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn create_step(&self, payload: &Value) -> Result<CareerStep> {
        let data = self
            .send(Method::POST, "/api/v1/career/steps", Some(payload))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn update_step(&self, step_id: i64, payload: &Value) -> Result<CareerStep> {
        let data = self
            .send(
                Method::PUT,
                &format!("/api/v1/career/steps/{}", step_id),
                Some(payload),
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn delete_step(&self, step_id: i64) -> Result<Value> {
        self.send(
            Method::DELETE,
            &format!("/api/v1/career/steps/{}", step_id),
            None,
        )
        .await
    }

    pub async fn user_progress(&self, user_id: i64) -> Result<ProgressOverview> {
        let data = self
            .send(
                Method::GET,
                &format!("/api/v1/career/progress/{}", user_id),
                None,
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn sync(&self) -> Result<SyncReport> {
        let data = self.send(Method::PUT, "/api/v1/career/sync", None).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn summary(&self) -> Result<Vec<CareerSummary>> {
        let data = self
            .send(Method::GET, "/api/v1/career/summary", None)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/healthz", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Cannot reach careerd at {}: {}", self.base_url, e))?;
        let health = response
            .json()
            .await
            .map_err(|e| anyhow!("Invalid daemon response: {}", e))?;
        Ok(health)
    }
}

/// Pull `data` out of a success envelope, or turn the failure envelope's
/// message into the error.
fn unwrap_envelope(status: StatusCode, mut body: Value) -> Result<Value> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(body
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null));
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    Err(anyhow!(message))
}
