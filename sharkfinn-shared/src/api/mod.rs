use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ScheduleItem;

pub mod endpoints;
#[cfg(feature = "rest-client")]
pub mod rest;

pub const API_PREFIX: &str = "/api";

// Errors: every failure answers with this shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new<T: Into<String>>(error: T) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

// Health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub ok: bool,
    pub db: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<String>, // RFC3339 UTC
}

// Children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewChildReq {
    pub name: Option<String>,
    pub age: Option<i32>,
}

// Sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDto {
    pub id: i32,
    pub child_id: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewSessionReq {
    pub child_id: Option<i32>,
    pub notes: Option<String>,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionPatchReq {
    pub status: Option<String>,
    pub notes: Option<String>,
}

// Activity blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBlockDto {
    pub id: i32,
    pub session_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewActivityBlockReq {
    pub session_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub payload: Option<Value>,
}

// Social stories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialStoryDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewSocialStoryReq {
    pub title: Option<String>,
    pub body: Option<String>,
}

// Visual schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualScheduleDto {
    pub id: i32,
    pub child_id: i32,
    pub items: Vec<ScheduleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// `items` stays untyped here so malformed documents reach validation and
/// produce a precise message instead of a generic JSON rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewVisualScheduleReq {
    pub child_id: Option<i32>,
    pub items: Option<Value>,
}

// Rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardDto {
    pub id: i32,
    pub name: String,
    pub cost: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RedeemReq {
    pub child_id: Option<i32>,
    pub reward_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionDto {
    pub id: i32,
    pub child_id: i32,
    pub reward_id: Option<i32>,
    pub created_at: String,
}
