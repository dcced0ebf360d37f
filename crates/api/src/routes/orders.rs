//! Order lifecycle endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use domain::{
    CreateOrder, LineRequest, OrderId, OrderResponse, OrderService, OrderStatus, UpdateOrder,
};
use serde::Deserialize;
use store::{ItemStore, OrderStore};
use url::form_urlencoded;
use user_directory::UserDirectory;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, U>
where
    S: OrderStore + ItemStore + Clone,
    U: UserDirectory,
{
    pub order_service: OrderService<S, U>,
}

// -- Request types --

/// Body of `POST /orders`. Fields are optional so that missing values are
/// reported per field instead of as a decoding failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<i64>,
    pub order_items: Option<Vec<OrderItemRequest>>,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub order_items: Option<Vec<OrderItemRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub item_id: Option<i64>,
    pub quantity: Option<i64>,
}

type FieldErrors = BTreeMap<String, String>;

fn validate_items(items: Option<&[OrderItemRequest]>, errors: &mut FieldErrors) -> Vec<LineRequest> {
    let Some(items) = items else {
        errors.insert("orderItems".to_string(), "must not be null".to_string());
        return Vec::new();
    };
    if items.is_empty() {
        errors.insert("orderItems".to_string(), "must not be empty".to_string());
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_id = match item.item_id {
            Some(id) if id > 0 => Some(id),
            Some(_) => {
                errors.insert(
                    format!("orderItems[{index}].itemId"),
                    "must be positive".to_string(),
                );
                None
            }
            None => {
                errors.insert(
                    format!("orderItems[{index}].itemId"),
                    "must not be null".to_string(),
                );
                None
            }
        };
        let quantity = match item.quantity {
            Some(q) if q > 0 => match u32::try_from(q) {
                Ok(q) => Some(q),
                Err(_) => {
                    errors.insert(
                        format!("orderItems[{index}].quantity"),
                        format!("must not exceed {}", u32::MAX),
                    );
                    None
                }
            },
            Some(_) => {
                errors.insert(
                    format!("orderItems[{index}].quantity"),
                    "must be positive".to_string(),
                );
                None
            }
            None => {
                errors.insert(
                    format!("orderItems[{index}].quantity"),
                    "must not be null".to_string(),
                );
                None
            }
        };
        if let (Some(item_id), Some(quantity)) = (item_id, quantity) {
            lines.push(LineRequest::new(item_id, quantity));
        }
    }
    lines
}

impl CreateOrderRequest {
    fn into_command(self) -> Result<CreateOrder, ApiError> {
        let mut errors = FieldErrors::new();
        match self.user_id {
            Some(id) if id <= 0 => {
                errors.insert("userId".to_string(), "must be positive".to_string());
            }
            None => {
                errors.insert("userId".to_string(), "must not be null".to_string());
            }
            Some(_) => {}
        }
        let lines = validate_items(self.order_items.as_deref(), &mut errors);

        match self.user_id {
            Some(user_id) if errors.is_empty() => Ok(CreateOrder::new(user_id, lines)),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

impl UpdateOrderRequest {
    fn into_command(self, order_id: OrderId) -> Result<UpdateOrder, ApiError> {
        let mut errors = FieldErrors::new();
        let lines = validate_items(self.order_items.as_deref(), &mut errors);
        if errors.is_empty() {
            Ok(UpdateOrder::new(order_id, lines))
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

fn parse_order_id(raw: &str) -> Result<OrderId, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(OrderId::new(id)),
        _ => Err(ApiError::BadRequest(format!(
            "Invalid order id: {raw:?} (must be a positive integer)"
        ))),
    }
}

/// Collects `orderIds` from the raw query string. Accepts repeated keys
/// (`orderIds=1&orderIds=2`), comma-separated values (`orderIds=1,2`) or both.
fn parse_order_ids(query: Option<&str>) -> Result<Vec<OrderId>, ApiError> {
    let mut ids = Vec::new();
    let mut seen_key = false;

    let pairs = form_urlencoded::parse(query.unwrap_or_default().as_bytes());
    for (key, value) in pairs {
        if key != "orderIds" && key != "orderIds[]" {
            continue;
        }
        seen_key = true;
        for raw in value.split(',').filter(|raw| !raw.is_empty()) {
            ids.push(parse_order_id(raw)?);
        }
    }

    if !seen_key {
        return Err(ApiError::BadRequest(
            "Missing required query parameter: orderIds".to_string(),
        ));
    }
    Ok(ids)
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(format!("Malformed request body: {rejection}")))
}

// -- Handlers --

/// POST /orders — create an order from the requested lines.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let cmd = json_body(payload)?.into_command()?;
    let response = state.order_service.create_order(cmd).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /orders/{id} — load a single order.
#[tracing::instrument(skip(state))]
pub async fn get<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let order_id = parse_order_id(&id)?;
    Ok(Json(state.order_service.get_order_by_id(order_id).await?))
}

/// POST /orders/list?orderIds=1&orderIds=2 — load the existing orders among the ids.
#[tracing::instrument(skip(state))]
pub async fn list<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let ids = parse_order_ids(query.as_deref())?;
    Ok(Json(state.order_service.get_orders_by_ids(&ids).await?))
}

/// GET /orders/status/{status} — load every order in a status.
#[tracing::instrument(skip(state))]
pub async fn by_status<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(state.order_service.get_orders_by_status(status).await?))
}

/// PUT /orders/{id} — replace the line set of an order.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let order_id = parse_order_id(&id)?;
    let cmd = json_body(payload)?.into_command(order_id)?;
    Ok(Json(state.order_service.update_order_by_id(cmd).await?))
}

/// DELETE /orders/{id} — delete an order and its lines.
#[tracing::instrument(skip(state))]
pub async fn delete<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let order_id = parse_order_id(&id)?;
    state.order_service.delete_order_by_id(Some(order_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(query: &str) -> Vec<i64> {
        parse_order_ids(Some(query))
            .unwrap()
            .into_iter()
            .map(|id| id.as_i64())
            .collect()
    }

    #[test]
    fn order_ids_repeated_and_comma_forms() {
        assert_eq!(ids("orderIds=1&orderIds=2"), vec![1, 2]);
        assert_eq!(ids("orderIds=3,4"), vec![3, 4]);
        assert_eq!(ids("orderIds=5%2C6&other=x"), vec![5, 6]);
    }

    #[test]
    fn order_ids_are_percent_decoded() {
        assert_eq!(ids("orderIds=%31"), vec![1]);
        assert_eq!(ids("orderIds%5b%5d=7&orderIds%5B%5D=8"), vec![7, 8]);
        assert_eq!(ids("order%49ds=9"), vec![9]);
        assert_eq!(ids("orderIds=+10+"), vec![10]);
    }

    #[test]
    fn order_ids_missing_or_invalid() {
        assert!(parse_order_ids(None).is_err());
        assert!(parse_order_ids(Some("other=1")).is_err());
        assert!(parse_order_ids(Some("orderIds=abc")).is_err());
        assert!(parse_order_ids(Some("orderIds=0")).is_err());
    }

    #[test]
    fn create_request_reports_every_bad_field() {
        let request: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "userId": -1,
            "orderItems": [{ "itemId": 1 }, { "itemId": 0, "quantity": 2 }]
        }))
        .unwrap();

        let Err(ApiError::Validation(fields)) = request.into_command() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["userId"], "must be positive");
        assert_eq!(fields["orderItems[0].quantity"], "must not be null");
        assert_eq!(fields["orderItems[1].itemId"], "must be positive");
    }

    #[test]
    fn create_request_requires_items() {
        let request: CreateOrderRequest =
            serde_json::from_value(serde_json::json!({ "userId": 1, "orderItems": [] })).unwrap();

        let Err(ApiError::Validation(fields)) = request.into_command() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["orderItems"], "must not be empty");
    }

    #[test]
    fn valid_create_request_builds_command() {
        let request: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "userId": 123,
            "orderItems": [{ "itemId": 1, "quantity": 2 }]
        }))
        .unwrap();

        let cmd = request.into_command().unwrap();
        assert_eq!(cmd.user_id.as_i64(), 123);
        assert_eq!(cmd.lines, vec![LineRequest::new(1, 2)]);
    }
}
