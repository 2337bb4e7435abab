//! One scheduled reminder per row; exactly three per abandonment episode.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    #[sea_orm(string_value = "first")]
    First,
    #[sea_orm(string_value = "second")]
    Second,
    #[sea_orm(string_value = "final")]
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "reminder_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i64,
    pub abandoned_cart_id: i32,
    pub reminder_type: ReminderType,
    pub scheduled_for: OffsetDateTime,
    pub status: TaskStatus,
    pub sent_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::abandoned_cart::Entity",
        from = "Column::AbandonedCartId",
        to = "super::abandoned_cart::Column::Id"
    )]
    AbandonedCart,
}

impl Related<super::abandoned_cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AbandonedCart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
