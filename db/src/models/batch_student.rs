use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, QuerySelect, Set};

/// Roster membership: one row per (batch, student) pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "batch_students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub batch_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
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
    pub async fn assign(
        db: &DatabaseConnection,
        batch_id: i64,
        user_id: i64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            batch_id: Set(batch_id),
            user_id: Set(user_id),
        }
        .insert(db)
        .await
    }

    pub async fn remove(
        db: &DatabaseConnection,
        batch_id: i64,
        user_id: i64,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::BatchId.eq(batch_id))
            .filter(Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// All student ids of a batch, ascending for deterministic reads.
    pub async fn roster_ids<C>(db: &C, batch_id: i64) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::BatchId.eq(batch_id))
            .order_by_asc(Column::UserId)
            .into_tuple()
            .all(db)
            .await
    }

    pub async fn is_member<C>(db: &C, batch_id: i64, user_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Entity::find_by_id((batch_id, user_id)).one(db).await?.is_some())
    }
}
