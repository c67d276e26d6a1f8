use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::customer::{Customer, NewCustomer};
use crate::schema::customers;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn required_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    Ok(name.to_string())
}

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = [Customer]),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    pool: web::Data<DbPool>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || {
        let mut conn = pool.get()?;
        Ok::<_, AppError>(
            customers::table
                .order(customers::name.asc())
                .select(Customer::as_select())
                .load(&mut conn)?,
        )
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /customers
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    pool: web::Data<DbPool>,
    body: web::Json<CustomerRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let name = required_name(&body.name)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let new_customer = NewCustomer {
            id: Uuid::new_v4(),
            name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            birthdate: body.birthdate,
            notes: body.notes,
            loyalty_points: 0,
        };
        Ok::<_, AppError>(
            diesel::insert_into(customers::table)
                .values(&new_customer)
                .returning(Customer::as_returning())
                .get_result(&mut conn)?,
        )
    })
    .await??;

    Ok(HttpResponse::Created().json(result))
}

/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such customer"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerRequest>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let body = body.into_inner();
    let name = required_name(&body.name)?;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        diesel::update(customers::table.filter(customers::id.eq(customer_id)))
            .set((
                customers::name.eq(name),
                customers::email.eq(body.email),
                customers::phone.eq(body.phone),
                customers::address.eq(body.address),
                customers::birthdate.eq(body.birthdate),
                customers::notes.eq(body.notes),
            ))
            .returning(Customer::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)
    })
    .await??;

    Ok(HttpResponse::Ok().json(result))
}

/// DELETE /customers/{id}
///
/// Orders keep a denormalized customer name, so history survives; the FK
/// on orders makes the database reject deletion while the customer is
/// still referenced.
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such customer"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        let deleted = diesel::delete(customers::table.filter(customers::id.eq(customer_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
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

    #[test]
    fn name_is_trimmed() {
        assert_eq!(required_name("  Ana  ").unwrap(), "Ana");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(required_name("   "), Err(AppError::Validation(_))));
    }
}
