use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::db::{Customer, NewCustomer};
use crate::error::CrmError;
use crate::middleware::SessionUser;
use crate::server::CrmState;

#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
    pub count: usize,
    pub message: String,
}

/// POST /customers
pub async fn add_customer_handler(
    State(state): State<CrmState>,
    SessionUser(user): SessionUser,
    Form(form): Form<CustomerForm>,
) -> Result<impl IntoResponse, CrmError> {
    if form.name.is_empty() || form.email.is_empty() {
        return Err(CrmError::MissingField("Name and Email are required."));
    }

    let new_customer = NewCustomer::from_raw(form.name, form.email, form.phone, form.notes);
    let id = state.customers.add(new_customer.clone()).await?;
    let customer = new_customer.into_customer(id);
    info!(user = %user, id, "customer added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Customer '{}' added successfully!", customer.name),
            "customer": customer,
        })),
    ))
}

/// GET /customers
pub async fn list_customers_handler(
    State(state): State<CrmState>,
    _user: SessionUser,
) -> Result<Json<CustomerListResponse>, CrmError> {
    let customers = state.customers.list_all().await?;
    let message = if customers.is_empty() {
        "No customers in the database.".to_string()
    } else {
        format!("{} customer(s).", customers.len())
    };
    Ok(Json(CustomerListResponse {
        count: customers.len(),
        customers,
        message,
    }))
}

/// GET /customers/search?term=...
pub async fn search_customers_handler(
    State(state): State<CrmState>,
    _user: SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CustomerListResponse>, CrmError> {
    let customers = state.customers.search(&query.term).await?;
    let message = if customers.is_empty() {
        "No matching customer found.".to_string()
    } else {
        format!("Found {} matching customer(s).", customers.len())
    };
    Ok(Json(CustomerListResponse {
        count: customers.len(),
        customers,
        message,
    }))
}
