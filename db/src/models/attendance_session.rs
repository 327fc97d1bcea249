use crate::error::AttendanceError;
use crate::models::{attendance_record, batch, batch_student, class_config, subject};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, QueryTrait, Select, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// A bounded-time attendance-taking event tied to a subject, batch, and
/// classroom location.
///
/// `uuid` is the stable public identifier carried in every API path; the
/// auto-incremented `id` stays storage-internal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub description: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub status: SessionStatus,
    pub subject_id: i64,
    pub batch_id: i64,
    pub class_config_id: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session lifecycle. Monotonic: `new -> active -> completed`, with
/// `completed` terminal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString,
    Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "session_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[default]
    #[sea_orm(string_value = "new")]
    New,

    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "completed")]
    Completed,
}

impl SessionStatus {
    /// The status a session must currently hold for a transition into `self`
    /// to be legal. `new` is never a legal target.
    fn legal_predecessor(self) -> Option<SessionStatus> {
        match self {
            SessionStatus::New => None,
            SessionStatus::Active => Some(SessionStatus::New),
            SessionStatus::Completed => Some(SessionStatus::Active),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "super::class_config::Entity",
        from = "Column::ClassConfigId",
        to = "super::class_config::Column::Id"
    )]
    ClassConfig,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::class_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassConfig.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parameters for creating a session. Every field is required; the subject is
/// resolved by code, the batch and classroom config by id.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub subject_code: String,
    pub batch_id: i64,
    pub class_config_id: i64,
    pub created_by: i64,
}

/// Field edits applied by [`Model::edit`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub subject_code: Option<String>,
    pub batch_id: Option<i64>,
    pub class_config_id: Option<i64>,
}

impl Model {
    /// Creates a session in status `new` and materializes an `absent`
    /// attendance record for every roster member, atomically.
    pub async fn create(
        db: &DatabaseConnection,
        params: NewSession,
    ) -> Result<Self, AttendanceError> {
        if params.title.trim().is_empty() {
            return Err(AttendanceError::Validation("title is required".into()));
        }
        if params.description.trim().is_empty() {
            return Err(AttendanceError::Validation("description is required".into()));
        }
        if params.valid_from >= params.valid_to {
            return Err(AttendanceError::InvalidTimeRange);
        }

        let subject = subject::Model::find_by_code(db, params.subject_code.trim())
            .await?
            .ok_or(AttendanceError::NotFound("subject"))?;
        batch::Entity::find_by_id(params.batch_id)
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("batch"))?;
        class_config::Entity::find_by_id(params.class_config_id)
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("class config"))?;

        let roster = batch_student::Model::roster_ids(db, params.batch_id).await?;
        let now = Utc::now();

        let txn = db.begin().await?;
        let row = ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            title: Set(params.title.trim().to_owned()),
            description: Set(params.description.trim().to_owned()),
            valid_from: Set(params.valid_from),
            valid_to: Set(params.valid_to),
            status: Set(SessionStatus::New),
            subject_id: Set(subject.id),
            batch_id: Set(params.batch_id),
            class_config_id: Set(params.class_config_id),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        attendance_record::Model::materialize_absent(&txn, row.id, &roster).await?;
        txn.commit().await?;

        tracing::info!(session = %row.uuid, batch = row.batch_id, "attendance session created");
        Ok(row)
    }

    pub async fn find_by_uuid(
        db: &DatabaseConnection,
        uuid: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find().filter(Column::Uuid.eq(uuid)).one(db).await
    }

    /// Loads a session readable by `user_id`: its creator or a roster member.
    pub async fn get_authorized(
        db: &DatabaseConnection,
        uuid: &str,
        user_id: i64,
    ) -> Result<Self, AttendanceError> {
        let session = Self::find_by_uuid(db, uuid)
            .await?
            .ok_or(AttendanceError::NotFound("session"))?;
        if session.created_by != user_id
            && !batch_student::Model::is_member(db, session.batch_id, user_id).await?
        {
            return Err(AttendanceError::Forbidden);
        }
        Ok(session)
    }

    /// Moves the session to `target`. Only `new -> active` and
    /// `active -> completed` are legal, and only for the creator.
    ///
    /// The write is compare-and-swap on the expected current status: if the
    /// status moved between read and write the transition fails instead of
    /// silently overwriting.
    pub async fn transition(
        db: &DatabaseConnection,
        uuid: &str,
        requester: i64,
        target: SessionStatus,
    ) -> Result<Self, AttendanceError> {
        let session = Self::find_by_uuid(db, uuid)
            .await?
            .ok_or(AttendanceError::NotFound("session"))?;
        if session.created_by != requester {
            return Err(AttendanceError::Forbidden);
        }

        let Some(expected) = target.legal_predecessor() else {
            return Err(AttendanceError::IllegalTransition {
                from: session.status,
                to: target,
            });
        };

        let res = Entity::update_many()
            .set(ActiveModel {
                status: Set(target),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(Column::Id.eq(session.id))
            .filter(Column::Status.eq(expected))
            .exec(db)
            .await?;

        if res.rows_affected == 0 {
            let current = Entity::find_by_id(session.id)
                .one(db)
                .await?
                .ok_or(AttendanceError::NotFound("session"))?;
            return Err(AttendanceError::IllegalTransition {
                from: current.status,
                to: target,
            });
        }

        tracing::info!(session = %session.uuid, to = %target, "session transitioned");
        Entity::find_by_id(session.id)
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("session"))
    }

    /// Applies field edits. Permitted while `new` or `active`; a batch change
    /// reconciles the roster (new members gain `absent` placeholders, removed
    /// members keep any `present` record for audit).
    pub async fn edit(
        db: &DatabaseConnection,
        uuid: &str,
        requester: i64,
        changes: SessionUpdate,
    ) -> Result<Self, AttendanceError> {
        let session = Self::find_by_uuid(db, uuid)
            .await?
            .ok_or(AttendanceError::NotFound("session"))?;
        if session.created_by != requester {
            return Err(AttendanceError::Forbidden);
        }
        if session.status == SessionStatus::Completed {
            return Err(AttendanceError::Validation(
                "completed sessions cannot be edited".into(),
            ));
        }

        let valid_from = changes.valid_from.unwrap_or(session.valid_from);
        let valid_to = changes.valid_to.unwrap_or(session.valid_to);
        if valid_from >= valid_to {
            return Err(AttendanceError::InvalidTimeRange);
        }

        let subject_id = match changes.subject_code.as_deref() {
            Some(code) => {
                subject::Model::find_by_code(db, code.trim())
                    .await?
                    .ok_or(AttendanceError::NotFound("subject"))?
                    .id
            }
            None => session.subject_id,
        };
        if let Some(config_id) = changes.class_config_id {
            class_config::Entity::find_by_id(config_id)
                .one(db)
                .await?
                .ok_or(AttendanceError::NotFound("class config"))?;
        }

        // A changed batch swaps the roster underneath existing records.
        let new_batch = match changes.batch_id {
            Some(batch_id) if batch_id != session.batch_id => {
                batch::Entity::find_by_id(batch_id)
                    .one(db)
                    .await?
                    .ok_or(AttendanceError::NotFound("batch"))?;
                Some(batch_id)
            }
            _ => None,
        };

        let txn = db.begin().await?;
        let mut am: ActiveModel = session.clone().into();
        if let Some(title) = changes.title {
            if title.trim().is_empty() {
                return Err(AttendanceError::Validation("title is required".into()));
            }
            am.title = Set(title.trim().to_owned());
        }
        if let Some(description) = changes.description {
            if description.trim().is_empty() {
                return Err(AttendanceError::Validation("description is required".into()));
            }
            am.description = Set(description.trim().to_owned());
        }
        am.valid_from = Set(valid_from);
        am.valid_to = Set(valid_to);
        am.subject_id = Set(subject_id);
        if let Some(config_id) = changes.class_config_id {
            am.class_config_id = Set(config_id);
        }
        if let Some(batch_id) = new_batch {
            am.batch_id = Set(batch_id);
        }
        am.updated_at = Set(Utc::now());
        let updated = am.update(&txn).await?;

        if let Some(batch_id) = new_batch {
            let roster = batch_student::Model::roster_ids(&txn, batch_id).await?;
            attendance_record::Model::reconcile_roster(&txn, session.id, &roster).await?;
        }
        txn.commit().await?;

        Ok(updated)
    }

    /// Deletes the session and all of its attendance records, whatever the
    /// status. Creator only.
    pub async fn delete(
        db: &DatabaseConnection,
        uuid: &str,
        requester: i64,
    ) -> Result<(), AttendanceError> {
        let session = Self::find_by_uuid(db, uuid)
            .await?
            .ok_or(AttendanceError::NotFound("session"))?;
        if session.created_by != requester {
            return Err(AttendanceError::Forbidden);
        }

        let txn = db.begin().await?;
        attendance_record::Entity::delete_many()
            .filter(attendance_record::Column::SessionId.eq(session.id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(session.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(session = %session.uuid, "session deleted");
        Ok(())
    }

    /// Sessions created by a professor, newest first.
    pub fn query_for_professor(creator_id: i64, status: Option<SessionStatus>) -> Select<Entity> {
        let mut sel = Entity::find().filter(Column::CreatedBy.eq(creator_id));
        if let Some(s) = status {
            sel = sel.filter(Column::Status.eq(s));
        }
        sel.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id)
    }

    /// Sessions whose batch roster contains the student, newest first.
    pub fn query_for_student(student_id: i64, status: Option<SessionStatus>) -> Select<Entity> {
        let member_batches = batch_student::Entity::find()
            .select_only()
            .column(batch_student::Column::BatchId)
            .filter(batch_student::Column::UserId.eq(student_id))
            .into_query();

        let mut sel = Entity::find().filter(Column::BatchId.in_subquery(member_batches));
        if let Some(s) = status {
            sel = sel.filter(Column::Status.eq(s));
        }
        sel.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Whether `now` falls inside the validity window (inclusive bounds).
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now <= self.valid_to
    }
}
