pub mod abandoned_cart;
pub mod reminder_task;
