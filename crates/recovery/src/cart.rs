//! Collaborator seams: live cart contents and user contact lookup.
//!
//! The host application owns carts and user profiles; this subsystem only
//! reads them through these traits. Production hosts back them with their own
//! services, tests with in-memory fakes.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a cart, copied verbatim into the abandonment snapshot.
///
/// The snapshot is a point-in-time copy: later price or title changes on the
/// product do not alter what an already-recorded episode remembers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: i64,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
    pub seller_id: i64,
}

impl CartLineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Where reminder emails for a user go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub display_name: String,
}

/// Read access to the user's live cart.
#[async_trait]
pub trait CartProvider: Send + Sync {
    /// Current line items of the user's live cart. Empty when the cart is empty.
    async fn line_items(&self, user_id: i64) -> Result<Vec<CartLineItem>, CollaboratorError>;
}

/// Contact resolution for reminder delivery.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Contact for the user, or `None` when the profile has no usable address.
    async fn contact(&self, user_id: i64) -> Result<Option<Contact>, CollaboratorError>;
}
