use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::stock_items;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = stock_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StockItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub unit: String,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Read-time comparison; never stored.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.minimum_quantity
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = stock_items)]
pub struct NewStockItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(quantity: i32, minimum: i32) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Sourdough loaf".to_string(),
            quantity,
            minimum_quantity: minimum,
            unit: "unit".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn low_at_or_below_minimum() {
        assert!(stock(5, 5).is_low());
        assert!(stock(0, 5).is_low());
        assert!(!stock(6, 5).is_low());
    }
}
