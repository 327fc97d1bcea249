use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents an authenticated caller in the `users` table.
///
/// Identity provisioning (registration, login) happens outside this service;
/// rows exist so that per-operation authorization can resolve a caller's role.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller role. Professors own sessions and batches; students mark attendance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "professor")]
    Professor,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        role: Role,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Resolves a caller's role, if the caller exists at all.
    pub async fn role_of(db: &DatabaseConnection, user_id: i64) -> Result<Option<Role>, DbErr> {
        Ok(Entity::find_by_id(user_id)
            .one(db)
            .await?
            .map(|u| u.role))
    }

    pub async fn is_professor(db: &DatabaseConnection, user_id: i64) -> Result<bool, DbErr> {
        Ok(Self::role_of(db, user_id).await? == Some(Role::Professor))
    }
}
