use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    amount::Amount,
    error::{ApiError, FieldError},
    timestamp::parse_timestamp,
};

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<TransactionType> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Partitions transactions into personal and office spending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    #[default]
    Personal,
    Office,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Office => "office",
        }
    }

    pub fn parse(value: &str) -> Option<Division> {
        match value {
            "personal" => Some(Self::Personal),
            "office" => Some(Self::Office),
            _ => None,
        }
    }
}

/// A transaction as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub description: String,
    pub category: String,
    pub division: Division,
    pub datetime: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl Transaction {
    pub(crate) fn to_new_transaction(&self) -> NewTransaction {
        NewTransaction {
            transaction_type: self.transaction_type,
            amount: self.amount.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            division: self.division,
            datetime: self.datetime,
        }
    }
}

/// The user supplied fields of a transaction, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub description: String,
    pub category: String,
    pub division: Division,
    pub datetime: DateTime<Utc>,
}

/// A create or update request body as the client sent it.
///
/// Fields are kept as raw JSON so that a wrongly typed field is reported as a
/// validation message for that field rather than rejecting the whole body.
/// An absent field and an explicit `null` are treated the same.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionInput {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<Value>,
}

impl TransactionInput {
    /// Fills every field missing from this patch with the value stored in
    /// `existing`.
    pub fn merged_onto(self, existing: &Transaction) -> TransactionInput {
        TransactionInput {
            transaction_type: self.transaction_type.or_else(|| {
                Some(Value::String(
                    existing.transaction_type.as_str().to_string(),
                ))
            }),
            amount: self
                .amount
                .or_else(|| Some(Value::String(existing.amount.to_string()))),
            description: self
                .description
                .or_else(|| Some(Value::String(existing.description.clone()))),
            category: self
                .category
                .or_else(|| Some(Value::String(existing.category.clone()))),
            division: self
                .division
                .or_else(|| Some(Value::String(existing.division.as_str().to_string()))),
            datetime: self.datetime.or_else(|| {
                Some(Value::String(
                    existing
                        .datetime
                        .to_rfc3339_opts(SecondsFormat::Millis, true),
                ))
            }),
        }
    }

    /// Checks every field and collects one message per failing field.
    pub fn validate(&self) -> Result<NewTransaction, ApiError> {
        let mut errors: Vec<FieldError> = Vec::new();

        let transaction_type = match &self.transaction_type {
            Some(Value::String(value)) => TransactionType::parse(value),
            _ => None,
        };
        if transaction_type.is_none() {
            errors.push(FieldError::new("type", "Type must be income or expense"));
        }

        let amount = match &self.amount {
            Some(Value::Number(value)) => Amount::parse(&value.to_string()).ok(),
            Some(Value::String(value)) => Amount::parse(value).ok(),
            _ => None,
        }
        .filter(|amount| !amount.is_negative());
        if amount.is_none() {
            errors.push(FieldError::new(
                "amount",
                "Amount must be a positive number",
            ));
        }

        let description = required_text(&self.description);
        if description.is_none() {
            errors.push(FieldError::new("description", "Description is required"));
        }

        let category = required_text(&self.category);
        if category.is_none() {
            errors.push(FieldError::new("category", "Category is required"));
        }

        let division = match &self.division {
            None => Some(Division::default()),
            Some(Value::String(value)) => Division::parse(value),
            Some(_) => None,
        };
        if division.is_none() {
            errors.push(FieldError::new(
                "division",
                "Division must be personal or office",
            ));
        }

        let datetime = match &self.datetime {
            Some(Value::String(value)) => parse_timestamp(value),
            _ => None,
        };
        if datetime.is_none() {
            errors.push(FieldError::new("datetime", "Valid datetime is required"));
        }

        match (
            transaction_type,
            amount,
            description,
            category,
            division,
            datetime,
        ) {
            (
                Some(transaction_type),
                Some(amount),
                Some(description),
                Some(category),
                Some(division),
                Some(datetime),
            ) => Ok(NewTransaction {
                transaction_type,
                amount,
                description,
                category,
                division,
                datetime,
            }),
            _ => Err(ApiError::ValidationFailed(errors)),
        }
    }
}

fn required_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}
