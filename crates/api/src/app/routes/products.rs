use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::Value;

use stocktake_products::{NewProduct, StockUpdate};

use crate::app::dto::{self, IdQuery, messages};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route(
        "/product",
        get(list_products)
            .post(create_product)
            .put(update_product)
            .delete(delete_product),
    )
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.products().list().await {
        Ok(products) => (
            StatusCode::OK,
            Json(dto::ListResponse {
                message: messages::FETCHED,
                products,
            }),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response("list", e, messages::FETCH_FAILED),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };

    let candidate = match NewProduct::from_candidate(&body) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.products().insert(candidate).await {
        Ok(stored) => {
            tracing::info!(id = %stored.id, "product created");
            (
                StatusCode::OK,
                Json(dto::CreatedResponse {
                    message: messages::ADDED,
                    data: stored,
                }),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response("insert", e, messages::PROCESSING_FAILED),
    }
}

/// Raw `key=value` pairs; repeated keys are kept so the first `id` can win.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    query: QueryPairs,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let query = match id_query(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };

    let id = match query.document_id() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let update = match StockUpdate::from_body(&body) {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.products().update_stock(&id, update).await {
        Ok(true) => {
            tracing::info!(%id, quantity = update.quantity, price = update.price, "product updated");
            (StatusCode::OK, Json(dto::MessageResponse { message: messages::UPDATED })).into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", messages::NOT_FOUND),
        Err(e) => errors::store_error_to_response("update_stock", e, messages::PROCESSING_FAILED),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    query: QueryPairs,
) -> axum::response::Response {
    let query = match id_query(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let Ok(id) = query.document_id() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "missing_id", messages::ID_REQUIRED);
    };

    match services.products().delete(&id).await {
        Ok(true) => {
            tracing::info!(%id, "product deleted");
            (StatusCode::OK, Json(dto::MessageResponse { message: messages::DELETED })).into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", messages::NOT_FOUND),
        Err(e) => errors::store_error_to_response("delete", e, messages::DELETE_FAILED),
    }
}

fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    tracing::warn!(error = %rejection.body_text(), "rejected request body");
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", messages::INVALID_BODY)
}

fn id_query(query: QueryPairs) -> Result<IdQuery, axum::response::Response> {
    match query {
        Ok(Query(pairs)) => Ok(IdQuery::from_pairs(pairs)),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected query string");
            Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_query",
                messages::INVALID_QUERY,
            ))
        }
    }
}
