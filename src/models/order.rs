use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::orders;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub order_number: i64,
    pub customer_name: String,
    pub customer_id: Option<Uuid>,
    pub total: BigDecimal,
    pub status: String,
    pub delivery_type: String,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Zero-padded display form of the persisted sequence number,
    /// e.g. 7 → "007".
    pub fn display_number(&self) -> String {
        format!("{:03}", self.order_number)
    }
}

/// `order_number` is intentionally absent: the database sequence assigns it
/// atomically on insert.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_id: Option<Uuid>,
    pub total: BigDecimal,
    pub status: String,
    pub delivery_type: String,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn order_with_number(n: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: n,
            customer_name: "Maria".to_string(),
            customer_id: None,
            total: BigDecimal::from_str("10.00").unwrap(),
            status: "PENDING".to_string(),
            delivery_type: "pickup".to_string(),
            delivery_address: None,
            delivery_date: None,
            notes: None,
            payment_method: "cash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_number_is_zero_padded() {
        assert_eq!(order_with_number(1).display_number(), "001");
        assert_eq!(order_with_number(42).display_number(), "042");
        assert_eq!(order_with_number(999).display_number(), "999");
    }

    #[test]
    fn display_number_grows_past_three_digits() {
        assert_eq!(order_with_number(1000).display_number(), "1000");
    }
}
