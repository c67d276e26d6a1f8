use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::schema::{orders, sales, stock_items};
use crate::status::OrderStatus;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryParams {
    /// One of "daily", "weekly", "monthly". Defaults to daily.
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummaryResponse {
    pub period: String,
    pub revenue: String,
    pub units_sold: i64,
    pub line_count: i64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub orders_today: i64,
    pub revenue_today: String,
    pub pending_orders: i64,
    pub low_stock_count: i64,
}

fn period_cutoff(period: &str) -> Result<DateTime<Utc>, AppError> {
    let days = match period {
        "daily" => 1,
        "weekly" => 7,
        "monthly" => 30,
        other => {
            return Err(AppError::Validation(format!(
                "period must be daily, weekly or monthly, got '{}'",
                other
            )))
        }
    };
    Ok(Utc::now() - Duration::days(days))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /sales/summary?period=daily|weekly|monthly
///
/// Aggregates the append-only sales table over the trailing window.
#[utoipa::path(
    get,
    path = "/sales/summary",
    params(
        ("period" = Option<String>, Query, description = "daily, weekly or monthly"),
    ),
    responses(
        (status = 200, description = "Revenue and units over the window", body = SalesSummaryResponse),
        (status = 400, description = "Unknown period"),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "reporting"
)]
pub async fn sales_summary(
    pool: web::Data<DbPool>,
    query: web::Query<SummaryParams>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let period = query
        .into_inner()
        .period
        .unwrap_or_else(|| "daily".to_string());
    let cutoff = period_cutoff(&period)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let revenue: Option<BigDecimal> = sales::table
            .filter(sales::sold_at.ge(cutoff))
            .select(sum(sales::subtotal))
            .first(&mut conn)?;
        let units: Option<i64> = sales::table
            .filter(sales::sold_at.ge(cutoff))
            .select(sum(sales::quantity))
            .first(&mut conn)?;
        let line_count: i64 = sales::table
            .filter(sales::sold_at.ge(cutoff))
            .count()
            .get_result(&mut conn)?;

        Ok::<_, AppError>(SalesSummaryResponse {
            period,
            revenue: revenue.unwrap_or_else(|| BigDecimal::from(0)).to_string(),
            units_sold: units.unwrap_or(0),
            line_count,
        })
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /stats/dashboard
///
/// Headline numbers for the admin landing page. A datastore failure here
/// must not blank the whole page, so errors are logged and the counters
/// degrade to zeros.
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardResponse),
        (status = 401, description = "Missing or invalid session"),
    ),
    tag = "reporting"
)]
pub async fn dashboard(
    pool: web::Data<DbPool>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let computed = web::block(move || {
        let mut conn = pool.get()?;
        let day_ago = Utc::now() - Duration::days(1);

        let orders_today: i64 = orders::table
            .filter(orders::created_at.ge(day_ago))
            .count()
            .get_result(&mut conn)?;
        let revenue_today: Option<BigDecimal> = sales::table
            .filter(sales::sold_at.ge(day_ago))
            .select(sum(sales::subtotal))
            .first(&mut conn)?;
        let pending_orders: i64 = orders::table
            .filter(orders::status.eq(OrderStatus::Pending.to_string()))
            .count()
            .get_result(&mut conn)?;
        let low_stock_count: i64 = stock_items::table
            .filter(stock_items::quantity.le(stock_items::minimum_quantity))
            .count()
            .get_result(&mut conn)?;

        Ok::<_, AppError>(DashboardResponse {
            orders_today,
            revenue_today: revenue_today.unwrap_or_else(|| BigDecimal::from(0)).to_string(),
            pending_orders,
            low_stock_count,
        })
    })
    .await;

    let response = match computed {
        Ok(Ok(r)) => r,
        Ok(Err(e)) => {
            log::error!("dashboard query failed, serving zeros: {}", e);
            zeros()
        }
        Err(e) => {
            log::error!("dashboard worker failed, serving zeros: {}", e);
            zeros()
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

fn zeros() -> DashboardResponse {
    DashboardResponse {
        revenue_today: "0".to_string(),
        ..DashboardResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_periods_resolve() {
        for p in ["daily", "weekly", "monthly"] {
            assert!(period_cutoff(p).is_ok());
        }
    }

    #[test]
    fn unknown_period_is_a_validation_error() {
        assert!(matches!(
            period_cutoff("yearly"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn weekly_cutoff_is_seven_days_back() {
        let cutoff = period_cutoff("weekly").unwrap();
        let delta = Utc::now() - cutoff;
        assert!(delta >= Duration::days(7) && delta < Duration::days(7) + Duration::minutes(1));
    }

    #[test]
    fn zero_dashboard_has_zero_revenue() {
        let z = zeros();
        assert_eq!(z.revenue_today, "0");
        assert_eq!(z.orders_today, 0);
    }
}
