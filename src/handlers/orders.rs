use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::customer::{Customer, NewCustomer};
use crate::models::order::{NewOrder, Order};
use crate::models::order_item::{NewOrderItem, OrderItem};
use crate::models::sale::NewSale;
use crate::schema::{customers, order_items, orders, sales};
use crate::status::{display_for, OrderStatus};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub total: String,
    pub delivery_type: String,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Zero-padded display number, e.g. "007".
    pub number: String,
    pub id: Uuid,
    pub customer_name: String,
    pub customer: Option<Customer>,
    pub total: String,
    pub status: String,
    pub status_label: String,
    pub progress: u8,
    pub delivery_type: String,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Restrict to orders created within the trailing number of days.
    pub window: Option<i64>,
}

fn order_response(order: Order, customer: Option<Customer>, items: Vec<OrderItem>) -> OrderResponse {
    let (status_label, progress) = display_for(&order.status);
    OrderResponse {
        number: order.display_number(),
        id: order.id,
        customer_name: order.customer_name,
        customer,
        total: order.total.to_string(),
        status: order.status,
        status_label: status_label.to_string(),
        progress,
        delivery_type: order.delivery_type,
        delivery_address: order.delivery_address,
        delivery_date: order.delivery_date,
        notes: order.notes,
        payment_method: order.payment_method,
        created_at: order.created_at.to_rfc3339(),
        updated_at: order.updated_at.to_rfc3339(),
        items: items
            .into_iter()
            .map(|i| OrderItemResponse {
                id: i.id,
                product_id: i.product_id,
                product_name: i.product_name,
                quantity: i.quantity,
                unit_price: i.unit_price.to_string(),
                subtotal: i.subtotal.to_string(),
            })
            .collect(),
    }
}

fn parse_money(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("{} must be a decimal number, got '{}'", field, raw)))
}

fn load_order_response(
    conn: &mut PgConnection,
    order: Order,
) -> Result<OrderResponse, AppError> {
    let items = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::created_at.asc())
        .select(OrderItem::as_select())
        .load(conn)?;

    let customer = match order.customer_id {
        Some(cid) => customers::table
            .filter(customers::id.eq(cid))
            .select(Customer::as_select())
            .first(conn)
            .optional()?,
        None => None,
    };

    Ok(order_response(order, customer, items))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders?window=<days>
///
/// Orders newest-first, each with its nested customer and items. The
/// `number` field comes from the persisted sequence, so it is stable across
/// polls and window choices.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("window" = Option<i64>, Query, description = "Trailing window in days"),
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    query: web::Query<ListOrdersParams>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let window = query.into_inner().window.filter(|days| *days > 0);

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let mut q = orders::table
            .order(orders::order_number.desc())
            .select(Order::as_select())
            .into_boxed();
        if let Some(days) = window {
            q = q.filter(orders::created_at.ge(Utc::now() - Duration::days(days)));
        }
        let rows = q.load(&mut conn)?;

        let items = OrderItem::belonging_to(&rows)
            .order(order_items::created_at.asc())
            .select(OrderItem::as_select())
            .load(&mut conn)?
            .grouped_by(&rows);

        let customer_ids: Vec<Uuid> = rows.iter().filter_map(|o| o.customer_id).collect();
        let customer_map: HashMap<Uuid, Customer> = customers::table
            .filter(customers::id.eq_any(&customer_ids))
            .select(Customer::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let responses: Vec<OrderResponse> = rows
            .into_iter()
            .zip(items)
            .map(|(order, items)| {
                let customer = order.customer_id.and_then(|id| customer_map.get(&id).cloned());
                order_response(order, customer, items)
            })
            .collect();

        Ok::<_, AppError>(responses)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /orders
///
/// Creates an order together with its items and one sales record per item.
/// Everything happens inside a single database transaction so a failure on
/// any row rolls the whole order back; the order number is assigned by the
/// database sequence at insert time.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing customer name or non-positive total"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let customer_name = body.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(AppError::Validation("customerName is required".to_string()));
    }
    let total = parse_money("total", &body.total)?;
    if total <= BigDecimal::zero() {
        return Err(AppError::Validation("total must be positive".to_string()));
    }

    let result = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<_, AppError, _>(|conn| {
            // Reuse the customer matching the submitted phone, creating one
            // lazily when nothing matches.
            let phone = body
                .customer_phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string);
            let customer = match &phone {
                Some(p) => {
                    let existing = customers::table
                        .filter(customers::phone.eq(p))
                        .select(Customer::as_select())
                        .first(conn)
                        .optional()?;
                    match existing {
                        Some(c) => Some(c),
                        None => {
                            let new_customer = NewCustomer {
                                id: Uuid::new_v4(),
                                name: customer_name.clone(),
                                email: None,
                                phone: phone.clone(),
                                address: body.delivery_address.clone(),
                                birthdate: None,
                                notes: None,
                                loyalty_points: 0,
                            };
                            Some(
                                diesel::insert_into(customers::table)
                                    .values(&new_customer)
                                    .returning(Customer::as_returning())
                                    .get_result(conn)?,
                            )
                        }
                    }
                }
                None => None,
            };

            let new_order = NewOrder {
                id: Uuid::new_v4(),
                customer_name: customer_name.clone(),
                customer_id: customer.as_ref().map(|c| c.id),
                total: total.clone(),
                status: OrderStatus::Pending.to_string(),
                delivery_type: body.delivery_type.clone(),
                delivery_address: body.delivery_address.clone(),
                delivery_date: body.delivery_date,
                notes: body.notes.clone(),
                payment_method: body
                    .payment_method
                    .clone()
                    .unwrap_or_else(|| "cash".to_string()),
            };
            let order: Order = diesel::insert_into(orders::table)
                .values(&new_order)
                .returning(Order::as_returning())
                .get_result(conn)?;

            let new_items: Vec<NewOrderItem> = body
                .items
                .iter()
                .map(|i| {
                    Ok(NewOrderItem {
                        id: Uuid::new_v4(),
                        order_id: order.id,
                        product_id: i.product_id,
                        product_name: i.product_name.clone(),
                        quantity: i.quantity,
                        unit_price: parse_money("unitPrice", &i.unit_price)?,
                        subtotal: parse_money("subtotal", &i.subtotal)?,
                    })
                })
                .collect::<Result<_, AppError>>()?;
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            // Flattened reporting copy, written in the same transaction.
            let new_sales: Vec<NewSale> = new_items
                .iter()
                .map(|i| NewSale {
                    id: Uuid::new_v4(),
                    order_id: i.order_id,
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price.clone(),
                    subtotal: i.subtotal.clone(),
                })
                .collect();
            diesel::insert_into(sales::table)
                .values(&new_sales)
                .execute(conn)?;

            let items = new_items
                .iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price.to_string(),
                    subtotal: i.subtotal.to_string(),
                })
                .collect();

            let (status_label, progress) = display_for(&order.status);
            Ok(OrderResponse {
                number: order.display_number(),
                id: order.id,
                customer_name: order.customer_name,
                customer,
                total: order.total.to_string(),
                status: order.status,
                status_label: status_label.to_string(),
                progress,
                delivery_type: order.delivery_type,
                delivery_address: order.delivery_address,
                delivery_date: order.delivery_date,
                notes: order.notes,
                payment_method: order.payment_method,
                created_at: order.created_at.to_rfc3339(),
                updated_at: order.updated_at.to_rfc3339(),
                items,
            })
        })
    })
    .await??;

    Ok(HttpResponse::Created().json(result))
}

/// GET /orders/track/{number}
///
/// Public tracking lookup by display number. Leading zeros are fine
/// ("007" and "7" resolve the same order); anything that is not a positive
/// integer is a 404.
#[utoipa::path(
    get,
    path = "/orders/track/{number}",
    params(
        ("number" = String, Path, description = "Display number, e.g. 007"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "No order with that number"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn track_order(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let number: i64 = path
        .into_inner()
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(AppError::NotFound)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let order = orders::table
            .filter(orders::order_number.eq(number))
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(order) = order else {
            return Err(AppError::NotFound);
        };

        load_order_response(&mut conn, order)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// PATCH /orders
///
/// Moves an order along its lifecycle. The new status must be one of the
/// known states and reachable from the current one (re-asserting the current
/// status is accepted); Delivered and Cancelled are terminal.
#[utoipa::path(
    patch,
    path = "/orders",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Unknown status or disallowed transition"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such order"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    pool: web::Data<DbPool>,
    body: web::Json<UpdateOrderStatusRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let next: OrderStatus = body
        .status
        .parse()
        .map_err(|e: crate::status::UnknownStatus| AppError::Validation(e.to_string()))?;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<_, AppError, _>(|conn| {
            let order = orders::table
                .filter(orders::id.eq(body.id))
                .select(Order::as_select())
                .first(conn)
                .optional()?
                .ok_or(AppError::NotFound)?;

            // Rows predating enum enforcement may hold arbitrary strings;
            // treat those as Pending for transition purposes.
            let current = order.status.parse().unwrap_or(OrderStatus::Pending);
            if !current.can_transition_to(next) {
                return Err(AppError::Validation(format!(
                    "cannot move order from {} to {}",
                    current, next
                )));
            }

            let updated: Order = diesel::update(orders::table.filter(orders::id.eq(order.id)))
                .set((
                    orders::status.eq(next.to_string()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(Order::as_returning())
                .get_result(conn)?;

            load_order_response(conn, updated)
        })
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_accepts_plain_decimals() {
        assert_eq!(parse_money("total", "55.00").unwrap(), BigDecimal::from_str("55.00").unwrap());
        assert_eq!(parse_money("total", " 10 ").unwrap(), BigDecimal::from(10));
    }

    #[test]
    fn parse_money_rejects_garbage() {
        let err = parse_money("total", "ten dollars").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("total"));
    }

    #[test]
    fn parse_money_keeps_negative_values_for_caller_to_judge() {
        // The positivity check lives with the caller: totals must be > 0,
        // but parsing itself is sign-agnostic.
        assert_eq!(parse_money("total", "-1.50").unwrap(), BigDecimal::from_str("-1.50").unwrap());
    }
}
