//! Shared test fixtures: in-memory database, fake collaborators, canned
//! resources.

#![allow(dead_code)]

use async_trait::async_trait;
use cart_recovery::AppResources;
use cart_recovery::cart::{CartLineItem, CartProvider, Contact, ContactDirectory};
use cart_recovery::config::{AppConfig, SmtpConfig};
use cart_recovery::error::{CollaboratorError, NotificationError};
use cart_recovery::notify::{Notification, NotificationSender};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

#[derive(Default)]
pub struct FakeCarts {
    items: Mutex<HashMap<i64, Vec<CartLineItem>>>,
}

impl FakeCarts {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_items(user_id: i64, items: Vec<CartLineItem>) -> Arc<Self> {
        let carts = Self::default();
        carts.set(user_id, items);
        Arc::new(carts)
    }

    pub fn set(&self, user_id: i64, items: Vec<CartLineItem>) {
        self.items.lock().unwrap().insert(user_id, items);
    }
}

#[async_trait]
impl CartProvider for FakeCarts {
    async fn line_items(&self, user_id: i64) -> Result<Vec<CartLineItem>, CollaboratorError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeContacts {
    contacts: Mutex<HashMap<i64, Contact>>,
}

impl FakeContacts {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_contact(user_id: i64, email: &str, display_name: &str) -> Arc<Self> {
        let contacts = Self::default();
        contacts.set(user_id, email, display_name);
        Arc::new(contacts)
    }

    pub fn set(&self, user_id: i64, email: &str, display_name: &str) {
        self.contacts.lock().unwrap().insert(
            user_id,
            Contact {
                email: email.to_string(),
                display_name: display_name.to_string(),
            },
        );
    }
}

#[async_trait]
impl ContactDirectory for FakeContacts {
    async fn contact(&self, user_id: i64) -> Result<Option<Contact>, CollaboratorError> {
        Ok(self.contacts.lock().unwrap().get(&user_id).cloned())
    }
}

/// What the fake transport does with every send.
#[derive(Debug, Clone, Copy)]
pub enum SendBehavior {
    Accept,
    Decline,
    Error,
}

pub struct RecordingSender {
    behavior: SendBehavior,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSender {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            behavior: SendBehavior::Accept,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            behavior: SendBehavior::Decline,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn erroring() -> Arc<Self> {
        Arc::new(Self {
            behavior: SendBehavior::Error,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, notification: &Notification) -> Result<bool, NotificationError> {
        match self.behavior {
            SendBehavior::Accept => {
                self.sent.lock().unwrap().push(notification.clone());
                Ok(true)
            }
            SendBehavior::Decline => Ok(false),
            SendBehavior::Error => Err(NotificationError::Transport("connection refused".into())),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        smtp: SmtpConfig {
            server: "smtp.example.com".into(),
            port: 587,
            username: "mailer".into(),
            password: "secret".into(),
            from: "Marketplace <no-reply@example.com>".into(),
        },
        storefront_url: "https://shop.example.com".into(),
        dispatch_interval_secs: 300,
    }
}

pub async fn resources_with(
    carts: Arc<FakeCarts>,
    contacts: Arc<FakeContacts>,
    sender: Arc<RecordingSender>,
) -> AppResources {
    AppResources {
        db: Arc::new(setup_db().await),
        sender,
        carts,
        contacts,
        config: Arc::new(test_config()),
    }
}

pub fn line_item(product_id: i64, unit_price: &str, quantity: i32) -> CartLineItem {
    CartLineItem {
        product_id,
        title: format!("Product {product_id}"),
        unit_price: unit_price.parse().unwrap(),
        quantity,
        thumbnail: Some(format!("https://cdn.example.com/p/{product_id}.jpg")),
        seller_id: 7,
    }
}
