use sea_orm::{entity::prelude::*, sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, NotSet, QueryFilter, Select, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::month::Month;
use crate::validation::NewSubscription;

/// A user's subscription to a paid service.
///
/// `start_date`/`end_date` always hold the first day of a month.
/// `deleted_at` is set instead of removing the row; live queries go
/// through [`find_live`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn start_month(&self) -> Month {
        Month::from_date(self.start_date)
    }

    pub fn end_month(&self) -> Option<Month> {
        self.end_date.map(Month::from_date)
    }
}

/// Select over rows that are not soft-deleted.
pub fn find_live() -> Select<Entity> {
    Entity::find().filter(Column::DeletedAt.is_null())
}

/// Copy validated fields onto an active model; timestamps are left to the caller.
pub fn apply(am: &mut ActiveModel, fields: &NewSubscription) {
    am.service_name = Set(fields.service_name.clone());
    am.price = Set(fields.price);
    am.user_id = Set(fields.user_id);
    am.start_date = Set(fields.start.first_day());
    am.end_date = Set(fields.end.map(|m| m.first_day()));
}

pub async fn create(db: &DatabaseConnection, fields: &NewSubscription) -> Result<Model, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut am = ActiveModel {
        id: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    apply(&mut am, fields);
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Mark a live row deleted; returns whether a row was affected.
pub async fn soft_delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::parse_month;
    use chrono::NaiveDate;

    fn sample() -> Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Model {
            id: 1,
            service_name: "Netflix".into(),
            price: 10,
            user_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn months_from_stored_dates() {
        let m = sample();
        assert_eq!(m.start_month(), parse_month("03-2025").unwrap());
        assert_eq!(m.end_month(), None);
        assert!(!m.is_deleted());
    }

    #[test]
    fn apply_sets_business_fields_only() {
        let fields = NewSubscription {
            service_name: "Spotify".into(),
            price: 250,
            user_id: Uuid::new_v4(),
            start: parse_month("01-2025").unwrap(),
            end: Some(parse_month("06-2025").unwrap()),
        };
        let mut am: ActiveModel = sample().into();
        apply(&mut am, &fields);
        assert_eq!(am.service_name, Set("Spotify".to_string()));
        assert_eq!(am.price, Set(250));
        assert_eq!(am.end_date, Set(NaiveDate::from_ymd_opt(2025, 6, 1)));
        assert!(!am.created_at.is_set());
        assert!(!am.deleted_at.is_set());
    }

    #[test]
    fn serializes_entity_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        for key in [
            "id", "service_name", "price", "user_id", "start_date", "end_date",
            "created_at", "updated_at", "deleted_at",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["start_date"], "2025-03-01");
        assert!(json["end_date"].is_null());
    }
}
