use crate::lookup::Keyed;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A markdown document served by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub title: String,
    pub body: String,
}

impl Keyed for Document {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A user record served by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub joined: NaiveDate,
}

impl Keyed for UserRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A restaurant listing served by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub category: String,
    pub hours: String,
    pub phone: String,
    pub address: String,
}

impl Keyed for Restaurant {
    fn key(&self) -> &str {
        &self.name
    }
}
