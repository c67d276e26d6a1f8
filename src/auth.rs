//! Session validation for protected routes.
//!
//! Sessions are issued by an external auth provider that writes rows into
//! the `sessions` table; this service only checks that the presented token
//! exists and has not expired. Handlers opt in by taking a [`Session`]
//! parameter.

use std::future::Future;
use std::pin::Pin;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::session::SessionRow;
use crate::schema::sessions;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_name: String,
}

/// Token comes from `X-Session-Token` or `Authorization: Bearer <uuid>`.
fn token_from_request(req: &HttpRequest) -> Option<Uuid> {
    if let Some(raw) = req.headers().get("X-Session-Token") {
        return raw.to_str().ok()?.trim().parse().ok();
    }
    let auth = req.headers().get("Authorization")?.to_str().ok()?;
    auth.strip_prefix("Bearer ")?.trim().parse().ok()
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Session, AppError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = token_from_request(req);
        let pool = req.app_data::<web::Data<DbPool>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(AppError::Unauthorized)?;
            let pool = pool
                .ok_or_else(|| AppError::Internal("database pool not configured".to_string()))?;

            let row = web::block(move || {
                let mut conn = pool.get()?;
                sessions::table
                    .filter(sessions::token.eq(token))
                    .filter(sessions::expires_at.gt(Utc::now()))
                    .select(SessionRow::as_select())
                    .first(&mut conn)
                    .optional()
                    .map_err(AppError::from)
            })
            .await??;

            match row {
                Some(row) => Ok(Session {
                    user_name: row.user_name,
                }),
                None => Err(AppError::Unauthorized),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn reads_session_token_header() {
        let token = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("X-Session-Token", token.to_string()))
            .to_http_request();
        assert_eq!(token_from_request(&req), Some(token));
    }

    #[test]
    fn reads_bearer_token() {
        let token = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        assert_eq!(token_from_request(&req), Some(token));
    }

    #[test]
    fn rejects_garbage_and_missing_tokens() {
        let req = TestRequest::default()
            .insert_header(("X-Session-Token", "not-a-uuid"))
            .to_http_request();
        assert_eq!(token_from_request(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(token_from_request(&req), None);
    }
}
