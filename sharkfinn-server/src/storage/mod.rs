pub mod fixtures;
pub mod models;
pub mod schema;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use models::{
    ActivityBlock, Child, NewActivityBlock, NewChild, NewReward, NewRewardRedemption, NewSession,
    NewSocialStory, NewVisualSchedule, Reward, RewardRedemption, Session, SessionChanges,
    SocialStory, VisualSchedule,
};
use serde_json::Value;
use sharkfinn_shared::api::{
    ActivityBlockDto, ChildDto, HealthDto, RedemptionDto, RewardDto, SessionDto, SessionPatchReq,
    SocialStoryDto, VisualScheduleDto,
};
use sharkfinn_shared::domain::{DEFAULT_REWARDS, DEFAULT_SESSION_STATUS, ScheduleItem};
use std::time::Duration;
use tracing::trace;

pub use fixtures::Fixtures;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Structured error type for all storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A Diesel ORM error (query failure, constraint violation, etc.)
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Failed to acquire or build a connection from the pool.
    #[error("pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// A `spawn_blocking` task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A database migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored JSON document could not be encoded or decoded.
    #[error("document error: {0}")]
    Json(#[from] serde_json::Error),

    /// The operation needs a database and none is configured.
    #[error("Not implemented (no DB configured).")]
    Unsupported,
}

/// Data access for every endpoint. Live mode is backed by [`Store`], static
/// mode by [`Fixtures`]; handlers only see this trait.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Whether writes can be persisted.
    fn has_db(&self) -> bool;

    async fn health(&self) -> Result<HealthDto, StorageError>;

    async fn list_children(&self) -> Result<Vec<ChildDto>, StorageError>;
    async fn get_child(&self, id: i32) -> Result<Option<ChildDto>, StorageError>;
    async fn create_child(&self, name: &str, age: i32) -> Result<ChildDto, StorageError>;

    async fn create_session(
        &self,
        child_id: i32,
        notes: Option<&str>,
    ) -> Result<SessionDto, StorageError>;
    /// Returns `None` when no session has this id.
    async fn update_session(
        &self,
        id: i32,
        patch: &SessionPatchReq,
    ) -> Result<Option<SessionDto>, StorageError>;

    async fn create_activity_block(
        &self,
        session_id: i32,
        kind: &str,
        payload: &Value,
    ) -> Result<ActivityBlockDto, StorageError>;

    async fn list_social_stories(&self) -> Result<Vec<SocialStoryDto>, StorageError>;
    async fn create_social_story(
        &self,
        title: &str,
        body: &str,
    ) -> Result<SocialStoryDto, StorageError>;

    async fn list_visual_schedules(&self) -> Result<Vec<VisualScheduleDto>, StorageError>;
    async fn create_visual_schedule(
        &self,
        child_id: i32,
        items: &[ScheduleItem],
    ) -> Result<VisualScheduleDto, StorageError>;

    async fn list_rewards(&self) -> Result<Vec<RewardDto>, StorageError>;
    async fn redeem_reward(
        &self,
        child_id: i32,
        reward_id: i32,
    ) -> Result<RedemptionDto, StorageError>;
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        configure_sqlite_conn(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct Store {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl Store {
    /// Builds the pool without opening a connection, so an unreachable
    /// database surfaces on first use instead of at construction.
    pub fn open_sqlite(url: &str, max_size: u32) -> Self {
        let path = url.strip_prefix("sqlite://").unwrap_or(url);
        let manager = ConnectionManager::<SqliteConnection>::new(path);
        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(SqlitePragmas))
            .build_unchecked(manager);
        Store { pool }
    }

    /// Applies pending migrations, then seeds the default rewards when the
    /// rewards table is empty. Returns the number of seeded rewards.
    pub async fn bootstrap(&self) -> Result<usize, StorageError> {
        self.run(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| StorageError::Migration(e.to_string()))?;
            seed_default_rewards(conn)
        })
        .await
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StorageError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, StorageError> {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await?
    }
}

fn seed_default_rewards(conn: &mut SqliteConnection) -> Result<usize, StorageError> {
    use schema::rewards;
    conn.immediate_transaction(|conn| -> Result<usize, StorageError> {
        let existing: i64 = rewards::table.count().get_result(conn)?;
        if existing > 0 {
            return Ok(0);
        }
        let rows: Vec<NewReward> = DEFAULT_REWARDS
            .iter()
            .map(|&(name, cost)| NewReward { name, cost })
            .collect();
        Ok(diesel::insert_into(rewards::table)
            .values(&rows)
            .execute(conn)?)
    })
}

#[async_trait]
impl Repository for Store {
    fn has_db(&self) -> bool {
        true
    }

    async fn health(&self) -> Result<HealthDto, StorageError> {
        self.run(|conn| {
            let now: chrono::NaiveDateTime = diesel::select(diesel::dsl::now).get_result(conn)?;
            Ok(HealthDto {
                ok: true,
                db: true,
                status: None,
                now: Some(models::rfc3339(now)),
            })
        })
        .await
    }

    async fn list_children(&self) -> Result<Vec<ChildDto>, StorageError> {
        use schema::children::dsl::*;
        self.run(|conn| {
            let rows = children
                .order(id.asc())
                .select(Child::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(ChildDto::from).collect())
        })
        .await
    }

    async fn get_child(&self, child_id: i32) -> Result<Option<ChildDto>, StorageError> {
        use schema::children::dsl::*;
        self.run(move |conn| {
            Ok(children
                .find(child_id)
                .select(Child::as_select())
                .first(conn)
                .optional()?
                .map(ChildDto::from))
        })
        .await
    }

    async fn create_child(&self, name: &str, age: i32) -> Result<ChildDto, StorageError> {
        use schema::children;
        let name = name.to_string();
        trace!(%name, age, "create_child starting");
        self.run(move |conn| {
            let row = NewChild {
                name: &name,
                age,
                created_at: Utc::now().naive_utc(),
            };
            let child = diesel::insert_into(children::table)
                .values(&row)
                .returning(Child::as_returning())
                .get_result(conn)?;
            Ok(child.into())
        })
        .await
    }

    async fn create_session(
        &self,
        child_id: i32,
        notes: Option<&str>,
    ) -> Result<SessionDto, StorageError> {
        use schema::sessions;
        let notes = notes.map(str::to_string);
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            let row = NewSession {
                child_id,
                status: DEFAULT_SESSION_STATUS,
                notes: notes.as_deref(),
                created_at: now,
                updated_at: now,
            };
            let session = diesel::insert_into(sessions::table)
                .values(&row)
                .returning(Session::as_returning())
                .get_result(conn)?;
            Ok(session.into())
        })
        .await
    }

    async fn update_session(
        &self,
        session_id: i32,
        patch: &SessionPatchReq,
    ) -> Result<Option<SessionDto>, StorageError> {
        use schema::sessions;
        let patch = patch.clone();
        self.run(move |conn| {
            let changes = SessionChanges {
                status: patch.status.as_deref(),
                notes: patch.notes.as_deref(),
                updated_at: Utc::now().naive_utc(),
            };
            Ok(diesel::update(sessions::table.find(session_id))
                .set(&changes)
                .returning(Session::as_returning())
                .get_result(conn)
                .optional()?
                .map(SessionDto::from))
        })
        .await
    }

    async fn create_activity_block(
        &self,
        session_id: i32,
        kind: &str,
        payload: &Value,
    ) -> Result<ActivityBlockDto, StorageError> {
        use schema::activity_blocks;
        let kind = kind.to_string();
        let payload = serde_json::to_string(payload)?;
        self.run(move |conn| {
            let row = NewActivityBlock {
                session_id,
                kind: &kind,
                payload: &payload,
                created_at: Utc::now().naive_utc(),
            };
            let block = diesel::insert_into(activity_blocks::table)
                .values(&row)
                .returning(ActivityBlock::as_returning())
                .get_result(conn)?;
            Ok(ActivityBlockDto::try_from(block)?)
        })
        .await
    }

    async fn list_social_stories(&self) -> Result<Vec<SocialStoryDto>, StorageError> {
        use schema::social_stories::dsl::*;
        self.run(|conn| {
            let rows = social_stories
                .order(id.asc())
                .select(SocialStory::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(SocialStoryDto::from).collect())
        })
        .await
    }

    async fn create_social_story(
        &self,
        title: &str,
        body: &str,
    ) -> Result<SocialStoryDto, StorageError> {
        use schema::social_stories;
        let title = title.to_string();
        let body = body.to_string();
        self.run(move |conn| {
            let row = NewSocialStory {
                title: &title,
                body: &body,
                created_at: Utc::now().naive_utc(),
            };
            let story = diesel::insert_into(social_stories::table)
                .values(&row)
                .returning(SocialStory::as_returning())
                .get_result(conn)?;
            Ok(story.into())
        })
        .await
    }

    async fn list_visual_schedules(&self) -> Result<Vec<VisualScheduleDto>, StorageError> {
        use schema::visual_schedules::dsl::*;
        self.run(|conn| {
            let rows = visual_schedules
                .order(id.asc())
                .select(VisualSchedule::as_select())
                .load(conn)?;
            rows.into_iter()
                .map(|row| VisualScheduleDto::try_from(row).map_err(StorageError::from))
                .collect()
        })
        .await
    }

    async fn create_visual_schedule(
        &self,
        child_id: i32,
        items: &[ScheduleItem],
    ) -> Result<VisualScheduleDto, StorageError> {
        use schema::visual_schedules;
        let items = serde_json::to_string(items)?;
        self.run(move |conn| {
            let row = NewVisualSchedule {
                child_id,
                items: &items,
                created_at: Utc::now().naive_utc(),
            };
            let schedule = diesel::insert_into(visual_schedules::table)
                .values(&row)
                .returning(VisualSchedule::as_returning())
                .get_result(conn)?;
            Ok(VisualScheduleDto::try_from(schedule)?)
        })
        .await
    }

    async fn list_rewards(&self) -> Result<Vec<RewardDto>, StorageError> {
        use schema::rewards::dsl::*;
        self.run(|conn| {
            let rows = rewards
                .order(id.asc())
                .select(Reward::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(RewardDto::from).collect())
        })
        .await
    }

    async fn redeem_reward(
        &self,
        child_id: i32,
        reward_id: i32,
    ) -> Result<RedemptionDto, StorageError> {
        use schema::reward_redemptions;
        trace!(child_id, reward_id, "redeem_reward starting");
        self.run(move |conn| {
            let row = NewRewardRedemption {
                child_id,
                reward_id,
                created_at: Utc::now().naive_utc(),
            };
            let redemption = diesel::insert_into(reward_redemptions::table)
                .values(&row)
                .returning(RewardRedemption::as_returning())
                .get_result(conn)?;
            Ok(redemption.into())
        })
        .await
    }
}

fn configure_sqlite_conn(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    // WAL for read/write concurrency; foreign_keys is per-connection in SQLite
    // and drives the cascade rules declared in the schema.
    diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
    diesel::sql_query("PRAGMA synchronous=NORMAL;").execute(conn)?;
    diesel::sql_query("PRAGMA busy_timeout=5000;").execute(conn)?;
    diesel::sql_query("PRAGMA foreign_keys=ON;").execute(conn)?;
    Ok(())
}
