use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::sessions;

/// A row in the table the external auth provider populates. This service
/// only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    pub token: Uuid,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
