//! Handlers for the `/api/products` endpoints.
//!
//! Each handler pulls the `ProductService` out of `State`, calls it, and lets
//! `error::into_handler_result` decide between the success response and an error response.

use gotham::handler::HandlerError;
use gotham::helpers::http::response::{create_empty_response, create_response};
use gotham::hyper::{body, Body, Response, StatusCode};
use gotham::state::{request_id, FromState, State};
use gotham_derive::{StateData, StaticResponseExtender};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{bad_request, into_handler_result};
use crate::model::ProductRepresentation;
use crate::service::{ProductService, ServiceError};

/// Path segments of `/api/products/:id`.
#[derive(Deserialize, StateData, StaticResponseExtender)]
pub struct ProductIdExtractor {
    id: i64,
}

/// Path segments of `/api/products/name/:name`.
#[derive(Deserialize, StateData, StaticResponseExtender)]
pub struct ProductNameExtractor {
    name: String,
}

/// `GET /api/products`: `200` with every product, or `204` when there are none.
pub async fn list_products(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let service = ProductService::borrow_from(state).clone();
    let result = service.get_all_products().await;
    into_handler_result(state, result, |state, products| {
        if products.is_empty() {
            Ok(create_empty_response(state, StatusCode::NO_CONTENT))
        } else {
            json_response(state, StatusCode::OK, &products)
        }
    })
}

/// `POST /api/products`: stores the product in the body and echoes what was stored.
pub async fn create_product(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let representation = extract_json::<ProductRepresentation>(state).await?;
    let service = ProductService::borrow_from(state).clone();
    let result = service.create_product(representation).await;
    into_handler_result(state, result, |state, created| {
        info!("[{}] created product {:?}", request_id(state), created.name);
        json_response(state, StatusCode::OK, &created)
    })
}

/// `GET /api/products/:id`: the product, or `404` when there is none.
pub async fn get_product(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let ProductIdExtractor { id } = ProductIdExtractor::take_from(state);
    let service = ProductService::borrow_from(state).clone();
    let result = service
        .get_product_by_id(id)
        .await
        .and_then(|found| found.ok_or_else(ServiceError::product_not_found));
    into_handler_result(state, result, |state, product| {
        json_response(state, StatusCode::OK, &product)
    })
}

/// `GET /api/products/name/:name`: every product with exactly that name, possibly none.
pub async fn get_products_by_name(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let ProductNameExtractor { name } = ProductNameExtractor::take_from(state);
    let service = ProductService::borrow_from(state).clone();
    let result = service.get_products_by_name(&name).await;
    into_handler_result(state, result, |state, products| {
        json_response(state, StatusCode::OK, &products)
    })
}

/// `PUT /api/products/:id`: overwrites the product with the body, or `404` when there is none.
pub async fn update_product(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let ProductIdExtractor { id } = ProductIdExtractor::take_from(state);
    let details = extract_json::<ProductRepresentation>(state).await?;
    let service = ProductService::borrow_from(state).clone();
    let result = service.update_product(id, details).await;
    into_handler_result(state, result, |state, updated| {
        json_response(state, StatusCode::OK, &updated)
    })
}

/// `DELETE /api/products/:id`: `204` once removed, or `404` when there is none.
pub async fn delete_product(state: &mut State) -> Result<Response<Body>, HandlerError> {
    let ProductIdExtractor { id } = ProductIdExtractor::take_from(state);
    let service = ProductService::borrow_from(state).clone();
    let result = service.delete_product(id).await;
    into_handler_result(state, result, |state, ()| {
        info!("[{}] deleted product {}", request_id(state), id);
        Ok(create_empty_response(state, StatusCode::NO_CONTENT))
    })
}

fn json_response<T>(
    state: &State,
    status: StatusCode,
    value: &T,
) -> Result<Response<Body>, HandlerError>
where
    T: Serialize,
{
    let body = serde_json::to_vec(value)?;
    Ok(create_response(state, status, mime::APPLICATION_JSON, body))
}

async fn extract_json<T>(state: &mut State) -> Result<T, HandlerError>
where
    T: DeserializeOwned,
{
    let bytes = body::to_bytes(Body::take_from(state))
        .await
        .map_err(bad_request)?;
    serde_json::from_slice(&bytes).map_err(bad_request)
}
