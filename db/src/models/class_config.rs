use crate::error::AttendanceError;
use crate::geo;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};

/// A labeled geographic anchor used to geofence self-service marking.
///
/// Sessions reference a config by id and re-resolve it at mark time, so
/// editing a location moves the geofence for future marks of existing
/// sessions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "class_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    Sessions,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        label: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, AttendanceError> {
        if label.trim().is_empty() {
            return Err(AttendanceError::Validation("label is required".into()));
        }
        geo::check_coordinates(latitude, longitude)?;

        let now = Utc::now();
        let row = ActiveModel {
            label: Set(label.to_owned()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(row)
    }

    pub async fn edit(
        db: &DatabaseConnection,
        id: i64,
        label: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Self, AttendanceError> {
        let existing = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AttendanceError::NotFound("class config"))?;

        let lat = latitude.unwrap_or(existing.latitude);
        let lon = longitude.unwrap_or(existing.longitude);
        geo::check_coordinates(lat, lon)?;

        let mut am: ActiveModel = existing.into();
        if let Some(l) = label {
            if l.trim().is_empty() {
                return Err(AttendanceError::Validation("label is required".into()));
            }
            am.label = Set(l.to_owned());
        }
        am.latitude = Set(lat);
        am.longitude = Set(lon);
        am.updated_at = Set(Utc::now());

        let row = am.update(db).await?;
        Ok(row)
    }
}
