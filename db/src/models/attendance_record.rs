use crate::error::AttendanceError;
use crate::geo;
use crate::models::{attendance_session, batch_student, class_config};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

/// One ledger row per (session, student). A placeholder `absent` row exists
/// for every roster member from session creation; it flips to `present` at
/// most once and never flips back.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub status: AttendanceStatus,
    pub marked_at: Option<DateTime<Utc>>,
    pub marked_by: Option<MarkedBy>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,
}

/// Which path produced a `present` mark.
//
// NOTE: `DeriveActiveEnum` cannot be used here. Its generated helper enum
// title-cases each `string_value` into an identifier, and `"self"` becomes the
// reserved keyword `Self`, which fails to parse. The impls below are exactly
// what `DeriveActiveEnum` would emit for this enum (rs_type = String,
// db_type = Enum, enum_name = "marked_by_type"), with the internal helper
// variant named safely so the DB values remain `"self"` / `"professor"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarkedBy {
    #[serde(rename = "self")]
    SelfMark,

    Professor,
}

#[doc = " Hand-written ActiveEnum plumbing for MarkedBy (see note above)."]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedByEnum;

impl sea_orm::sea_query::Iden for MarkedByEnum {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", "marked_by_type").unwrap();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sea_orm::EnumIter)]
pub enum MarkedByVariant {
    SelfMark,
    Professor,
}

impl sea_orm::sea_query::Iden for MarkedByVariant {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::SelfMark => "self",
                Self::Professor => "professor",
            }
        )
        .unwrap();
    }
}

impl MarkedBy {
    pub fn iden_values() -> Vec<sea_orm::sea_query::DynIden> {
        <MarkedByVariant as sea_orm::strum::IntoEnumIterator>::iter()
            .map(|v| sea_orm::sea_query::SeaRc::new(v) as sea_orm::sea_query::DynIden)
            .collect()
    }
}

impl sea_orm::ActiveEnum for MarkedBy {
    type Value = String;
    type ValueVec = Vec<String>;

    fn name() -> sea_orm::sea_query::DynIden {
        sea_orm::sea_query::SeaRc::new(MarkedByEnum) as sea_orm::sea_query::DynIden
    }

    fn to_value(&self) -> <Self as sea_orm::ActiveEnum>::Value {
        match self {
            Self::SelfMark => "self",
            Self::Professor => "professor",
        }
        .to_owned()
    }

    fn try_from_value(v: &<Self as sea_orm::ActiveEnum>::Value) -> std::result::Result<Self, sea_orm::DbErr> {
        match v.as_ref() {
            "self" => Ok(Self::SelfMark),
            "professor" => Ok(Self::Professor),
            _ => Err(sea_orm::DbErr::Type(format!(
                "unexpected value for {} enum: {}",
                stringify!(MarkedBy),
                v
            ))),
        }
    }

    fn db_type() -> sea_orm::ColumnDef {
        sea_orm::prelude::ColumnTypeTrait::def(sea_orm::ColumnType::Enum {
            name: <Self as sea_orm::ActiveEnum>::name(),
            variants: Self::iden_values(),
        })
    }
}

#[allow(clippy::from_over_into)]
impl Into<sea_orm::sea_query::Value> for MarkedBy {
    fn into(self) -> sea_orm::sea_query::Value {
        <Self as sea_orm::ActiveEnum>::to_value(&self).into()
    }
}

impl sea_orm::TryGetable for MarkedBy {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        idx: I,
    ) -> std::result::Result<Self, sea_orm::TryGetError> {
        let value =
            <<Self as sea_orm::ActiveEnum>::Value as sea_orm::TryGetable>::try_get_by(res, idx)?;
        <Self as sea_orm::ActiveEnum>::try_from_value(&value).map_err(sea_orm::TryGetError::DbErr)
    }
}

impl sea_orm::sea_query::ValueType for MarkedBy {
    fn try_from(
        v: sea_orm::sea_query::Value,
    ) -> std::result::Result<Self, sea_orm::sea_query::ValueTypeErr> {
        let value = <<Self as sea_orm::ActiveEnum>::Value as sea_orm::sea_query::ValueType>::try_from(v)?;
        <Self as sea_orm::ActiveEnum>::try_from_value(&value).map_err(|_| sea_orm::sea_query::ValueTypeErr)
    }

    fn type_name() -> String {
        <<Self as sea_orm::ActiveEnum>::Value as sea_orm::sea_query::ValueType>::type_name()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        <<Self as sea_orm::ActiveEnum>::Value as sea_orm::sea_query::ValueType>::array_type()
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        <Self as sea_orm::ActiveEnum>::db_type()
            .get_column_type()
            .to_owned()
            .into()
    }

    fn enum_type_name() -> Option<&'static str> {
        Some(stringify!(MarkedBy))
    }
}

impl sea_orm::sea_query::Nullable for MarkedBy {
    fn null() -> sea_orm::sea_query::Value {
        <<Self as sea_orm::ActiveEnum>::Value as sea_orm::sea_query::Nullable>::null()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts `absent` placeholder rows for the given students.
    pub async fn materialize_absent<C>(
        db: &C,
        session_id: i64,
        student_ids: &[i64],
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if student_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<ActiveModel> = student_ids
            .iter()
            .map(|id| ActiveModel {
                session_id: Set(session_id),
                user_id: Set(*id),
                status: Set(AttendanceStatus::Absent),
                marked_at: Set(None),
                marked_by: Set(None),
            })
            .collect();
        Entity::insert_many(rows).exec(db).await?;
        Ok(())
    }

    /// Aligns a session's ledger with a new roster: members without a record
    /// gain `absent` placeholders; `absent` placeholders of departed members
    /// are dropped. `present` rows are never touched.
    pub async fn reconcile_roster<C>(
        db: &C,
        session_id: i64,
        roster: &[i64],
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let mut stale = Entity::delete_many()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::Status.eq(AttendanceStatus::Absent));
        if !roster.is_empty() {
            stale = stale.filter(Column::UserId.is_not_in(roster.iter().copied()));
        }
        stale.exec(db).await?;

        let existing: Vec<i64> = Entity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::SessionId.eq(session_id))
            .into_tuple()
            .all(db)
            .await?;
        let existing: HashSet<i64> = existing.into_iter().collect();
        let missing: Vec<i64> = roster
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();
        Self::materialize_absent(db, session_id, &missing).await
    }

    /// Student-initiated, geolocation-gated mark.
    ///
    /// The session must be active and inside its validity window; the student
    /// must be a roster member; the classroom anchor is re-resolved by id at
    /// mark time. Returns the updated record and the computed distance.
    ///
    /// The `absent -> present` flip is a conditional update keyed on the
    /// current `absent` status, so concurrent marks for the same pair yield
    /// exactly one success; the losers see `AlreadyMarked`.
    pub async fn mark_self(
        db: &DatabaseConnection,
        session: &attendance_session::Model,
        student_id: i64,
        reported_lat: f64,
        reported_lon: f64,
        radius_m: f64,
        now: DateTime<Utc>,
    ) -> Result<(Self, f64), AttendanceError> {
        if !session.is_active() || !session.is_within_window(now) {
            return Err(AttendanceError::SessionNotActive);
        }
        if !batch_student::Model::is_member(db, session.batch_id, student_id).await? {
            return Err(AttendanceError::NotInRoster);
        }

        let config = class_config::Entity::find_by_id(session.class_config_id)
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("class config"))?;
        let proximity = geo::validate(
            config.latitude,
            config.longitude,
            reported_lat,
            reported_lon,
            radius_m,
        )?;
        if !proximity.admitted {
            return Err(AttendanceError::OutOfRange {
                distance_m: proximity.distance_m,
                radius_m,
            });
        }

        let res = Entity::update_many()
            .set(ActiveModel {
                status: Set(AttendanceStatus::Present),
                marked_at: Set(Some(now)),
                marked_by: Set(Some(MarkedBy::SelfMark)),
                ..Default::default()
            })
            .filter(Column::SessionId.eq(session.id))
            .filter(Column::UserId.eq(student_id))
            .filter(Column::Status.eq(AttendanceStatus::Absent))
            .exec(db)
            .await?;

        if res.rows_affected == 0 {
            match Entity::find_by_id((session.id, student_id)).one(db).await? {
                Some(_) => return Err(AttendanceError::AlreadyMarked),
                None => {
                    // Roster member without a placeholder (joined the batch
                    // after the session was created): insert directly. The
                    // composite key arbitrates concurrent inserts.
                    let insert = Entity::insert(ActiveModel {
                        session_id: Set(session.id),
                        user_id: Set(student_id),
                        status: Set(AttendanceStatus::Present),
                        marked_at: Set(Some(now)),
                        marked_by: Set(Some(MarkedBy::SelfMark)),
                    })
                    .on_conflict(
                        OnConflict::columns([Column::SessionId, Column::UserId])
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec(db)
                    .await;
                    match insert {
                        Ok(_) => {}
                        Err(DbErr::RecordNotInserted) => {
                            return Err(AttendanceError::AlreadyMarked);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        let record = Entity::find_by_id((session.id, student_id))
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("attendance record"))?;
        tracing::info!(
            session = %session.uuid,
            student = student_id,
            distance_m = proximity.distance_m,
            "self-service attendance recorded"
        );
        Ok((record, proximity.distance_m))
    }

    /// Professor-initiated mark for a set of students, not geolocation-gated.
    ///
    /// Only the session creator may call this, and only while the session is
    /// active. Ids outside the roster are ignored. Returns how many records
    /// actually flipped to `present`.
    pub async fn mark_bulk(
        db: &DatabaseConnection,
        session: &attendance_session::Model,
        requester: i64,
        student_ids: &[i64],
        now: DateTime<Utc>,
    ) -> Result<u64, AttendanceError> {
        if session.created_by != requester {
            return Err(AttendanceError::Forbidden);
        }
        if !session.is_active() {
            return Err(AttendanceError::SessionNotActive);
        }
        if student_ids.is_empty() {
            return Ok(0);
        }

        let roster: HashSet<i64> = batch_student::Model::roster_ids(db, session.batch_id)
            .await?
            .into_iter()
            .collect();
        let targets: Vec<i64> = {
            let mut seen = HashSet::new();
            student_ids
                .iter()
                .copied()
                .filter(|id| roster.contains(id) && seen.insert(*id))
                .collect()
        };
        if targets.is_empty() {
            return Ok(0);
        }

        let txn = db.begin().await?;
        let updated = Entity::update_many()
            .set(ActiveModel {
                status: Set(AttendanceStatus::Present),
                marked_at: Set(Some(now)),
                marked_by: Set(Some(MarkedBy::Professor)),
                ..Default::default()
            })
            .filter(Column::SessionId.eq(session.id))
            .filter(Column::UserId.is_in(targets.clone()))
            .filter(Column::Status.eq(AttendanceStatus::Absent))
            .exec(&txn)
            .await?
            .rows_affected;

        // Roster members who joined after creation have no placeholder yet.
        let existing: Vec<i64> = Entity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::SessionId.eq(session.id))
            .filter(Column::UserId.is_in(targets.clone()))
            .into_tuple()
            .all(&txn)
            .await?;
        let existing: HashSet<i64> = existing.into_iter().collect();
        let missing: Vec<ActiveModel> = targets
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .map(|id| ActiveModel {
                session_id: Set(session.id),
                user_id: Set(id),
                status: Set(AttendanceStatus::Present),
                marked_at: Set(Some(now)),
                marked_by: Set(Some(MarkedBy::Professor)),
            })
            .collect();
        let inserted = missing.len() as u64;
        if !missing.is_empty() {
            Entity::insert_many(missing).exec(&txn).await?;
        }
        txn.commit().await?;

        tracing::info!(
            session = %session.uuid,
            marked = updated + inserted,
            "bulk attendance recorded"
        );
        Ok(updated + inserted)
    }

    /// The full ledger for a session, ascending student id for deterministic
    /// reads.
    pub async fn roster(db: &DatabaseConnection, session_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::UserId)
            .all(db)
            .await
    }

    /// Record counts per session: `(present, total)` keyed by session id.
    pub async fn status_counts_for<C>(
        db: &C,
        session_ids: &[i64],
    ) -> Result<std::collections::HashMap<i64, (i64, i64)>, DbErr>
    where
        C: ConnectionTrait,
    {
        use sea_orm::FromQueryResult;
        use sea_orm::sea_query::{Expr, Func};

        if session_ids.is_empty() {
            return Ok(std::collections::HashMap::new());
        }

        #[derive(FromQueryResult)]
        struct Row {
            session_id: i64,
            cnt: i64,
        }

        let totals: Vec<Row> = Entity::find()
            .select_only()
            .column(Column::SessionId)
            .column_as(
                Expr::expr(Func::count(Expr::col(Column::UserId))),
                "cnt",
            )
            .filter(Column::SessionId.is_in(session_ids.iter().cloned()))
            .group_by(Column::SessionId)
            .into_model::<Row>()
            .all(db)
            .await?;

        let presents: Vec<Row> = Entity::find()
            .select_only()
            .column(Column::SessionId)
            .column_as(
                Expr::expr(Func::count(Expr::col(Column::UserId))),
                "cnt",
            )
            .filter(Column::SessionId.is_in(session_ids.iter().cloned()))
            .filter(Column::Status.eq(AttendanceStatus::Present))
            .group_by(Column::SessionId)
            .into_model::<Row>()
            .all(db)
            .await?;

        let mut out: std::collections::HashMap<i64, (i64, i64)> = totals
            .into_iter()
            .map(|r| (r.session_id, (0, r.cnt)))
            .collect();
        for r in presents {
            out.entry(r.session_id).or_insert((0, 0)).0 = r.cnt;
        }
        Ok(out)
    }
}
