//! Reminder email rendering: one structured body, three tonal variants.

use crate::cart::CartLineItem;
use crate::entity::reminder_task::ReminderType;
use rust_decimal::Decimal;
use std::fmt::Write;

/// A reminder email for one abandonment episode.
///
/// All three reminder types render the same structured content (item list,
/// total, call-to-action link); only the subject and the opening line change
/// tone with the type.
pub struct ReminderEmail {
    pub reminder_type: ReminderType,
    pub display_name: String,
    pub items: Vec<CartLineItem>,
    pub total_value: Decimal,
    pub item_count: i32,
    pub cart_url: String,
}

impl ReminderEmail {
    pub fn subject(&self) -> String {
        match self.reminder_type {
            ReminderType::First => "You left items in your cart".to_string(),
            ReminderType::Second => "Your cart items are popular - don't miss out".to_string(),
            ReminderType::Final => "Last chance: your cart is about to be released".to_string(),
        }
    }

    fn opening(&self) -> &'static str {
        match self.reminder_type {
            ReminderType::First => "You left some items in your cart. They're still waiting for you:",
            ReminderType::Second => {
                "The items in your cart are popular and may sell out soon:"
            }
            ReminderType::Final => {
                "This is your last reminder - the items below will be released to other buyers if you don't check out:"
            }
        }
    }

    pub fn render_text(&self) -> String {
        let mut body = format!("Hello {},\n\n{}\n\n", self.display_name, self.opening());
        for item in &self.items {
            let _ = writeln!(
                body,
                "  - {} x{} @ {} each",
                item.title, item.quantity, item.unit_price
            );
            if let Some(thumbnail) = &item.thumbnail {
                let _ = writeln!(body, "    {thumbnail}");
            }
        }
        let _ = write!(
            body,
            "\n{} item(s), total {}\n\nFinish checking out: {}\n\nBest regards,\nThe Marketplace Team",
            self.item_count, self.total_value, self.cart_url
        );
        body
    }
}
