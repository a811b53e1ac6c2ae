//! Domain models for revenues and one-off or recurring expenses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A record that can act as a template for dated repetitions.
///
/// Implementors expose the anchor date and recurrence settings and know how to
/// produce a copy of themselves re-identified and re-dated.
pub trait Recurring: Clone {
    fn anchor_date(&self) -> NaiveDate;
    fn is_recurrent(&self) -> bool;
    fn frequency(&self) -> Option<Frequency>;
    fn status(&self) -> PaymentStatus;

    /// Returns a copy of this record with a new identity, date and status;
    /// every other field is carried over verbatim.
    fn reschedule(&self, id: Uuid, date: NaiveDate, status: PaymentStatus) -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Revenue {
    pub id: Uuid,
    pub member_id: Uuid,
    pub description: String,
    pub value: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub is_recurrent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl Revenue {
    pub fn new(
        member_id: Uuid,
        description: impl Into<String>,
        value: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            description: description.into(),
            value,
            date,
            category_id: None,
            status: PaymentStatus::Pending,
            is_recurrent: false,
            frequency: None,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurrent = true;
        self.frequency = Some(frequency);
        self
    }
}

impl Recurring for Revenue {
    fn anchor_date(&self) -> NaiveDate {
        self.date
    }

    fn is_recurrent(&self) -> bool {
        self.is_recurrent
    }

    fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn reschedule(&self, id: Uuid, date: NaiveDate, status: PaymentStatus) -> Self {
        Self {
            id,
            date,
            status,
            ..self.clone()
        }
    }
}

impl Identifiable for Revenue {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByMember for Revenue {
    fn member_id(&self) -> Uuid {
        self.member_id
    }
}

/// A one-off or recurring expense, dated by when it falls due.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub member_id: Uuid,
    pub description: String,
    pub value: Decimal,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub is_recurrent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl Expense {
    pub fn new(
        member_id: Uuid,
        description: impl Into<String>,
        value: Decimal,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            description: description.into(),
            value,
            due_date,
            category_id: None,
            payment_method: String::new(),
            status: PaymentStatus::Pending,
            is_recurrent: false,
            frequency: None,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurrent = true;
        self.frequency = Some(frequency);
        self
    }
}

impl Recurring for Expense {
    fn anchor_date(&self) -> NaiveDate {
        self.due_date
    }

    fn is_recurrent(&self) -> bool {
        self.is_recurrent
    }

    fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn reschedule(&self, id: Uuid, date: NaiveDate, status: PaymentStatus) -> Self {
        Self {
            id,
            due_date: date,
            status,
            ..self.clone()
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByMember for Expense {
    fn member_id(&self) -> Uuid {
        self.member_id
    }
}
