use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::Product;
use crate::models::stock::{NewStockItem, StockItem};
use crate::schema::{products, stock_items};

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub unit: String,
    /// Derived at read time, never stored.
    pub low_stock: bool,
    pub updated_at: String,
}

impl From<StockItem> for StockResponse {
    fn from(s: StockItem) -> Self {
        let low_stock = s.is_low();
        StockResponse {
            id: s.id,
            product_id: s.product_id,
            product_name: s.product_name,
            quantity: s.quantity,
            minimum_quantity: s.minimum_quantity,
            unit: s.unit,
            low_stock,
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityRequest {
    pub stock_id: Uuid,
    pub quantity: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetMinimumRequest {
    pub stock_id: Uuid,
    pub minimum_quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub created: usize,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /stock
#[utoipa::path(
    get,
    path = "/stock",
    responses(
        (status = 200, description = "All stock rows", body = [StockResponse]),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "stock"
)]
pub async fn list_stock(
    pool: web::Data<DbPool>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || {
        let mut conn = pool.get()?;
        let rows = stock_items::table
            .order(stock_items::product_name.asc())
            .select(StockItem::as_select())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows.into_iter().map(StockResponse::from).collect::<Vec<_>>())
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /stock
///
/// Sets the absolute quantity of a stock row, clamped at zero. The optional
/// reason is logged for the audit trail but not stored.
#[utoipa::path(
    post,
    path = "/stock",
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Updated stock row", body = StockResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such stock row"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "stock"
)]
pub async fn set_quantity(
    pool: web::Data<DbPool>,
    body: web::Json<SetQuantityRequest>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let clamped = body.quantity.max(0);

    if let Some(reason) = body.reason.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        log::info!(
            "stock {} set to {} by {}: {}",
            body.stock_id,
            clamped,
            session.user_name,
            reason
        );
    }

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let updated: StockItem =
            diesel::update(stock_items::table.filter(stock_items::id.eq(body.stock_id)))
                .set((
                    stock_items::quantity.eq(clamped),
                    stock_items::updated_at.eq(Utc::now()),
                ))
                .returning(StockItem::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or(AppError::NotFound)?;
        Ok::<_, AppError>(StockResponse::from(updated))
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// PUT /stock
///
/// Sets the low-stock threshold, clamped at zero.
#[utoipa::path(
    put,
    path = "/stock",
    request_body = SetMinimumRequest,
    responses(
        (status = 200, description = "Updated stock row", body = StockResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such stock row"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "stock"
)]
pub async fn set_minimum(
    pool: web::Data<DbPool>,
    body: web::Json<SetMinimumRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let clamped = body.minimum_quantity.max(0);

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let updated: StockItem =
            diesel::update(stock_items::table.filter(stock_items::id.eq(body.stock_id)))
                .set((
                    stock_items::minimum_quantity.eq(clamped),
                    stock_items::updated_at.eq(Utc::now()),
                ))
                .returning(StockItem::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or(AppError::NotFound)?;
        Ok::<_, AppError>(StockResponse::from(updated))
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /stock/sync
///
/// Creates a stock row for every active product that lacks one (quantity 0,
/// minimum 5, unit "unit"). Running it again with nothing missing writes
/// nothing.
#[utoipa::path(
    post,
    path = "/stock/sync",
    responses(
        (status = 200, description = "Rows created", body = SyncResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "stock"
)]
pub async fn sync_stock(
    pool: web::Data<DbPool>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || {
        let mut conn = pool.get()?;

        let covered: Vec<Uuid> = stock_items::table
            .select(stock_items::product_id)
            .load(&mut conn)?;

        let missing: Vec<Product> = products::table
            .filter(products::active.eq(true))
            .filter(products::id.ne_all(&covered))
            .select(Product::as_select())
            .load(&mut conn)?;

        let new_rows: Vec<NewStockItem> = missing
            .into_iter()
            .map(|p| NewStockItem {
                id: Uuid::new_v4(),
                product_id: p.id,
                product_name: p.name,
                quantity: 0,
                minimum_quantity: 5,
                unit: "unit".to_string(),
            })
            .collect();

        let created = if new_rows.is_empty() {
            0
        } else {
            diesel::insert_into(stock_items::table)
                .values(&new_rows)
                .execute(&mut conn)?
        };

        Ok::<_, AppError>(SyncResponse { created })
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}
