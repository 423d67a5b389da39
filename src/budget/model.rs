//! Credit card and balance records.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A document in the `cards` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub alias: String,
    pub network: String,
    pub last_digits: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

/// A document in the `balances` collection. One per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub total_amount: f64,
    pub spend_amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
    pub alias: String,
    pub network: String,
    pub last_digits: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBalance {
    pub total_amount: f64,
    #[serde(default)]
    pub spend_amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub id: Option<String>,
    pub owner_id: String,
    pub alias: String,
    pub network: String,
    pub last_digits: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<CreditCard> for CardResponse {
    fn from(card: CreditCard) -> Self {
        Self {
            id: card.id.map(|id| id.to_hex()),
            owner_id: card.owner_id.to_hex(),
            alias: card.alias,
            network: card.network,
            last_digits: card.last_digits,
            created_at: card
                .created_at
                .and_then(|at| at.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub id: Option<String>,
    pub owner_id: String,
    pub total_amount: f64,
    pub spend_amount: f64,
    pub currency: String,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            id: balance.id.map(|id| id.to_hex()),
            owner_id: balance.owner_id.to_hex(),
            total_amount: balance.total_amount,
            spend_amount: balance.spend_amount,
            currency: balance.currency,
        }
    }
}
