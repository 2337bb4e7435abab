//! One abandonment episode per row.
//!
//! A row is created when the tracker first marks a user's cart abandoned and
//! is never deleted, only status-transitioned. At most one row per user is at
//! `abandoned` at any time; the tracker refreshes that row instead of opening
//! a second episode.

use crate::cart::CartLineItem;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
    #[sea_orm(string_value = "recovered")]
    Recovered,
    #[sea_orm(string_value = "expired")]
    Expired,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "abandoned_cart")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i64,
    /// Serialized `Vec<CartLineItem>`, captured at abandonment time.
    pub cart_snapshot: Json,
    pub total_value: Decimal,
    pub item_count: i32,
    pub status: CartStatus,
    /// Start of this abandonment episode; reset on refresh.
    pub abandoned_at: OffsetDateTime,
    pub recovered_at: Option<OffsetDateTime>,
    pub first_reminder_sent_at: Option<OffsetDateTime>,
    pub second_reminder_sent_at: Option<OffsetDateTime>,
    pub final_reminder_sent_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reminder_task::Entity")]
    ReminderTask,
}

impl Related<super::reminder_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReminderTask.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Point-in-time line items captured when the cart was marked abandoned.
    pub fn snapshot_items(&self) -> Vec<CartLineItem> {
        serde_json::from_value(self.cart_snapshot.clone()).unwrap_or_default()
    }
}
