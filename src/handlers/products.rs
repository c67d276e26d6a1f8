use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::{NewProduct, Product};
use crate::schema::products;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string, e.g. "12.50"
    pub price: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    /// Include inactive (soft-deleted) products.
    #[serde(default)]
    pub all: bool,
}

fn validate(body: &ProductRequest) -> Result<(String, BigDecimal), AppError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let price = BigDecimal::from_str(body.price.trim())
        .map_err(|_| AppError::Validation(format!("price must be a decimal number, got '{}'", body.price)))?;
    if price < BigDecimal::zero() {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    Ok((name, price))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Public storefront listing; active products only unless `?all=true`.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("all" = Option<bool>, Query, description = "Include inactive products"),
    ),
    responses(
        (status = 200, description = "Products", body = [Product]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let include_inactive = query.into_inner().all;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let mut q = products::table
            .order(products::name.asc())
            .select(Product::as_select())
            .into_boxed();
        if !include_inactive {
            q = q.filter(products::active.eq(true));
        }
        Ok::<_, AppError>(q.load(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "No such product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;
        products::table
            .filter(products::id.eq(product_id))
            .select(Product::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Missing name or invalid price"),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<ProductRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (name, price) = validate(&body)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let new_product = NewProduct {
            id: Uuid::new_v4(),
            name,
            description: body.description,
            price,
            category: body.category,
            image_url: body.image_url,
            active: true,
        };
        Ok::<_, AppError>(
            diesel::insert_into(products::table)
                .values(&new_product)
                .returning(Product::as_returning())
                .get_result(&mut conn)?,
        )
    })
    .await??;

    Ok(HttpResponse::Created().json(result))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Missing name or invalid price"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let body = body.into_inner();
    let (name, price) = validate(&body)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        diesel::update(products::table.filter(products::id.eq(product_id)))
            .set((
                products::name.eq(name),
                products::description.eq(body.description),
                products::price.eq(price),
                products::category.eq(body.category),
                products::image_url.eq(body.image_url),
                products::updated_at.eq(Utc::now()),
            ))
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// DELETE /products/{id}
///
/// Soft delete: the row stays (historical orders reference it) but leaves
/// the storefront listing.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deactivated"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set((
                products::active.eq(false),
                products::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, price: &str) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            description: None,
            price: price.to_string(),
            category: None,
            image_url: None,
        }
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            validate(&request("  ", "5.00")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn negative_price_rejected() {
        assert!(matches!(
            validate(&request("Croissant", "-1")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn zero_price_allowed() {
        // Free samples exist.
        let (name, price) = validate(&request("Tasting cube", "0")).unwrap();
        assert_eq!(name, "Tasting cube");
        assert_eq!(price, BigDecimal::zero());
    }
}
