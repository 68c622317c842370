//! Fixed sample data served when no database is configured, so the frontend
//! can run as a demo. Nothing here is ever mutated.

use super::{Repository, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use sharkfinn_shared::api::{
    ActivityBlockDto, ChildDto, HealthDto, RedemptionDto, RewardDto, SessionDto, SessionPatchReq,
    SocialStoryDto, VisualScheduleDto,
};
use sharkfinn_shared::domain::ScheduleItem;

const SAMPLE_CHILD_NAME: &str = "Sample Child";
const SAMPLE_CHILD_AGE: i32 = 6;
const STARTER_CHILD_ID: i32 = 2;
const STARTER_NOTE: &str = "Starter (no DB)";

#[derive(Debug, Clone, Copy, Default)]
pub struct Fixtures;

fn sample_child(id: i32) -> ChildDto {
    ChildDto {
        id,
        name: SAMPLE_CHILD_NAME.to_string(),
        age: SAMPLE_CHILD_AGE,
        created_at: None,
        note: None,
    }
}

#[async_trait]
impl Repository for Fixtures {
    fn has_db(&self) -> bool {
        false
    }

    async fn health(&self) -> Result<HealthDto, StorageError> {
        Ok(HealthDto {
            ok: true,
            db: false,
            status: Some("healthy (no DB configured)".to_string()),
            now: None,
        })
    }

    async fn list_children(&self) -> Result<Vec<ChildDto>, StorageError> {
        Ok(vec![sample_child(1)])
    }

    async fn get_child(&self, id: i32) -> Result<Option<ChildDto>, StorageError> {
        Ok(Some(sample_child(id)))
    }

    /// Echoes the input without storing it.
    async fn create_child(&self, name: &str, age: i32) -> Result<ChildDto, StorageError> {
        Ok(ChildDto {
            id: STARTER_CHILD_ID,
            name: name.to_string(),
            age,
            created_at: None,
            note: Some(STARTER_NOTE.to_string()),
        })
    }

    async fn create_session(
        &self,
        _child_id: i32,
        _notes: Option<&str>,
    ) -> Result<SessionDto, StorageError> {
        Err(StorageError::Unsupported)
    }

    async fn update_session(
        &self,
        _id: i32,
        _patch: &SessionPatchReq,
    ) -> Result<Option<SessionDto>, StorageError> {
        Err(StorageError::Unsupported)
    }

    async fn create_activity_block(
        &self,
        _session_id: i32,
        _kind: &str,
        _payload: &Value,
    ) -> Result<ActivityBlockDto, StorageError> {
        Err(StorageError::Unsupported)
    }

    async fn list_social_stories(&self) -> Result<Vec<SocialStoryDto>, StorageError> {
        Ok(vec![SocialStoryDto {
            id: 1,
            title: "Welcome".to_string(),
            body: "Be kind and brave.".to_string(),
            created_at: None,
        }])
    }

    async fn create_social_story(
        &self,
        _title: &str,
        _body: &str,
    ) -> Result<SocialStoryDto, StorageError> {
        Err(StorageError::Unsupported)
    }

    async fn list_visual_schedules(&self) -> Result<Vec<VisualScheduleDto>, StorageError> {
        Ok(vec![VisualScheduleDto {
            id: 1,
            child_id: 1,
            items: vec![ScheduleItem::new(Some("08:00"), "Breakfast")],
            created_at: None,
        }])
    }

    async fn create_visual_schedule(
        &self,
        _child_id: i32,
        _items: &[ScheduleItem],
    ) -> Result<VisualScheduleDto, StorageError> {
        Err(StorageError::Unsupported)
    }

    async fn list_rewards(&self) -> Result<Vec<RewardDto>, StorageError> {
        Ok(vec![RewardDto {
            id: 1,
            name: "Sticker Pack".to_string(),
            cost: 5,
            created_at: None,
        }])
    }

    async fn redeem_reward(
        &self,
        _child_id: i32,
        _reward_id: i32,
    ) -> Result<RedemptionDto, StorageError> {
        Err(StorageError::Unsupported)
    }
}
