use crate::storage::schema::{
    activity_blocks, children, reward_redemptions, rewards, sessions, social_stories,
    visual_schedules,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use sharkfinn_shared::api;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = children)]
pub struct Child {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = children)]
pub struct NewChild<'a> {
    pub name: &'a str,
    pub age: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(belongs_to(Child, foreign_key = child_id))]
pub struct Session {
    pub id: i32,
    pub child_id: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub child_id: i32,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `None` fields are skipped by diesel, so they keep the stored value.
#[derive(AsChangeset)]
#[diesel(table_name = sessions)]
pub struct SessionChanges<'a> {
    pub status: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = activity_blocks)]
#[diesel(belongs_to(Session, foreign_key = session_id))]
pub struct ActivityBlock {
    pub id: i32,
    pub session_id: i32,
    pub kind: String,
    pub payload: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = activity_blocks)]
pub struct NewActivityBlock<'a> {
    pub session_id: i32,
    pub kind: &'a str,
    pub payload: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = social_stories)]
pub struct SocialStory {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = social_stories)]
pub struct NewSocialStory<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = visual_schedules)]
#[diesel(belongs_to(Child, foreign_key = child_id))]
pub struct VisualSchedule {
    pub id: i32,
    pub child_id: i32,
    pub items: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = visual_schedules)]
pub struct NewVisualSchedule<'a> {
    pub child_id: i32,
    pub items: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = rewards)]
pub struct Reward {
    pub id: i32,
    pub name: String,
    pub cost: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = rewards)]
pub struct NewReward<'a> {
    pub name: &'a str,
    pub cost: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = reward_redemptions)]
#[diesel(belongs_to(Child, foreign_key = child_id))]
#[diesel(belongs_to(Reward, foreign_key = reward_id))]
pub struct RewardRedemption {
    pub id: i32,
    pub child_id: i32,
    pub reward_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = reward_redemptions)]
pub struct NewRewardRedemption {
    pub child_id: i32,
    pub reward_id: i32,
    pub created_at: NaiveDateTime,
}

pub fn rfc3339(dt: NaiveDateTime) -> String {
    chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(dt, chrono::Utc).to_rfc3339()
}

impl From<Child> for api::ChildDto {
    fn from(c: Child) -> Self {
        api::ChildDto {
            id: c.id,
            name: c.name,
            age: c.age,
            created_at: Some(rfc3339(c.created_at)),
            note: None,
        }
    }
}

impl From<Session> for api::SessionDto {
    fn from(s: Session) -> Self {
        api::SessionDto {
            id: s.id,
            child_id: s.child_id,
            status: s.status,
            notes: s.notes,
            created_at: rfc3339(s.created_at),
            updated_at: rfc3339(s.updated_at),
        }
    }
}

impl TryFrom<ActivityBlock> for api::ActivityBlockDto {
    type Error = serde_json::Error;

    fn try_from(b: ActivityBlock) -> Result<Self, Self::Error> {
        Ok(api::ActivityBlockDto {
            id: b.id,
            session_id: b.session_id,
            kind: b.kind,
            payload: serde_json::from_str(&b.payload)?,
            created_at: rfc3339(b.created_at),
        })
    }
}

impl From<SocialStory> for api::SocialStoryDto {
    fn from(s: SocialStory) -> Self {
        api::SocialStoryDto {
            id: s.id,
            title: s.title,
            body: s.body,
            created_at: Some(rfc3339(s.created_at)),
        }
    }
}

impl TryFrom<VisualSchedule> for api::VisualScheduleDto {
    type Error = serde_json::Error;

    fn try_from(v: VisualSchedule) -> Result<Self, Self::Error> {
        Ok(api::VisualScheduleDto {
            id: v.id,
            child_id: v.child_id,
            items: serde_json::from_str(&v.items)?,
            created_at: Some(rfc3339(v.created_at)),
        })
    }
}

impl From<Reward> for api::RewardDto {
    fn from(r: Reward) -> Self {
        api::RewardDto {
            id: r.id,
            name: r.name,
            cost: r.cost,
            created_at: Some(rfc3339(r.created_at)),
        }
    }
}

impl From<RewardRedemption> for api::RedemptionDto {
    fn from(r: RewardRedemption) -> Self {
        api::RedemptionDto {
            id: r.id,
            child_id: r.child_id,
            reward_id: r.reward_id,
            created_at: rfc3339(r.created_at),
        }
    }
}
