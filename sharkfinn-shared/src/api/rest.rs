//! Minimal REST client helpers for consumers (frontend tooling, scripts, tests).
//! Feature-gated by `rest-client` to avoid pulling reqwest into the server binary.

use super::endpoints as ep;
use super::*;

pub use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http: {0}")]
    Http(String),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serde: {0}")]
    Serde(String),
}

impl RestError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Client {
    base: String,
    http: reqwest::Client,
}

async fn handle_json<T: for<'de> serde::Deserialize<'de>>(
    res: reqwest::Response,
) -> Result<T, RestError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    res.json::<T>()
        .await
        .map_err(|e| RestError::Serde(e.to_string()))
}

impl Client {
    pub fn new(base: &str) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RestError::Http(e.to_string()))?;
        Ok(Self {
            base: base.to_string(),
            http,
        })
    }

    async fn get<T: for<'de> serde::Deserialize<'de>>(&self, url: String) -> Result<T, RestError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RestError::Http(e.to_string()))?;
        handle_json(res).await
    }

    async fn send<B: Serialize, T: for<'de> serde::Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        url: String,
        body: &B,
    ) -> Result<T, RestError> {
        let res = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| RestError::Http(e.to_string()))?;
        handle_json(res).await
    }

    pub async fn health(&self) -> Result<HealthDto, RestError> {
        self.get(ep::health(&self.base)).await
    }

    pub async fn list_children(&self) -> Result<Vec<ChildDto>, RestError> {
        self.get(ep::children(&self.base)).await
    }

    pub async fn get_child(&self, id: i32) -> Result<ChildDto, RestError> {
        self.get(ep::child(&self.base, id)).await
    }

    pub async fn create_child(&self, body: &NewChildReq) -> Result<ChildDto, RestError> {
        self.send(reqwest::Method::POST, ep::children(&self.base), body)
            .await
    }

    pub async fn create_session(&self, body: &NewSessionReq) -> Result<SessionDto, RestError> {
        self.send(reqwest::Method::POST, ep::sessions(&self.base), body)
            .await
    }

    pub async fn update_session(
        &self,
        id: i32,
        body: &SessionPatchReq,
    ) -> Result<SessionDto, RestError> {
        self.send(reqwest::Method::PATCH, ep::session(&self.base, id), body)
            .await
    }

    pub async fn create_activity_block(
        &self,
        body: &NewActivityBlockReq,
    ) -> Result<ActivityBlockDto, RestError> {
        self.send(reqwest::Method::POST, ep::activity_blocks(&self.base), body)
            .await
    }

    pub async fn list_social_stories(&self) -> Result<Vec<SocialStoryDto>, RestError> {
        self.get(ep::social_stories(&self.base)).await
    }

    pub async fn create_social_story(
        &self,
        body: &NewSocialStoryReq,
    ) -> Result<SocialStoryDto, RestError> {
        self.send(reqwest::Method::POST, ep::social_stories(&self.base), body)
            .await
    }

    pub async fn list_visual_schedules(&self) -> Result<Vec<VisualScheduleDto>, RestError> {
        self.get(ep::visual_schedules(&self.base)).await
    }

    pub async fn create_visual_schedule(
        &self,
        body: &NewVisualScheduleReq,
    ) -> Result<VisualScheduleDto, RestError> {
        self.send(reqwest::Method::POST, ep::visual_schedules(&self.base), body)
            .await
    }

    pub async fn list_rewards(&self) -> Result<Vec<RewardDto>, RestError> {
        self.get(ep::rewards(&self.base)).await
    }

    pub async fn redeem_reward(&self, body: &RedeemReq) -> Result<RedemptionDto, RestError> {
        self.send(reqwest::Method::POST, ep::rewards_redeem(&self.base), body)
            .await
    }
}
