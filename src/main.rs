//! tyrehub - Self-hosted Tyre & Lubricant Storefront Service

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tyrehub::config::Config;
use tyrehub::domain::aggregates::order::{Order, OrderStatus};
use tyrehub::domain::aggregates::product::{NewProduct, Product, ProductPatch};
use tyrehub::domain::aggregates::user::User;
use tyrehub::domain::facets::FacetSelection;
use tyrehub::service::orders::{CheckoutRequest, OrderError, OrderService};
use tyrehub::service::products::{CatalogError, CatalogListing, ProductService};
use tyrehub::service::users::{RegisterUser, UserError, UserService};
use tyrehub::store::memory::{MemoryObjectStore, MemoryStore};

#[derive(Clone)]
struct AppState {
    orders: Arc<OrderService>,
    products: Arc<ProductService>,
    users: Arc<UserService>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjectStore::default());
    let state = AppState {
        orders: Arc::new(OrderService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            config.admins.clone(),
            config.status_policy,
        )),
        products: Arc::new(ProductService::new(store.clone(), objects)),
        users: Arc::new(UserService::new(store, config.admins.clone())),
    };

    let app = Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "tyrehub"})) }))
        .route("/api/v1/products", get(list_products).post(create_product))
        .route("/api/v1/products/facets", get(product_facets))
        .route("/api/v1/products/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/api/v1/orders", get(orders_by_email).post(create_order))
        .route("/api/v1/orders/:id/status", patch(update_order_status))
        .route("/api/v1/admin/orders", get(all_orders))
        .route("/api/v1/admin/users", get(all_users))
        .route("/api/v1/users", post(register_user))
        .route("/api/v1/users/:id", get(get_user))
        .route("/api/v1/users/:id/profile-complete", get(profile_complete))
        .route("/api/v1/users/:id/phone", put(set_phone))
        .route("/api/v1/users/:id/vehicle", put(set_vehicle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("🚀 tyrehub listening on 0.0.0.0:{}", config.port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?,
        app,
    )
    .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct EmailParam {
    email: String,
}

// ── Catalog ──────────────────────────────────────────────────────────────────

async fn list_products(State(s): State<AppState>) -> Result<Json<CatalogListing>, (StatusCode, String)> {
    s.products
        .list()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>, (StatusCode, String)> {
    match s.products.get(&id).await {
        Ok(product) => Ok(Json(product)),
        Err(CatalogError::NotFound) => Err((StatusCode::NOT_FOUND, "Not found".to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

async fn product_facets(State(s): State<AppState>, Query(selection): Query<FacetSelection>) -> Response {
    match s.products.facets(&selection).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn create_product(State(s): State<AppState>, Json(input): Json<NewProduct>) -> (StatusCode, Json<serde_json::Value>) {
    match s.products.create(input).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "message": "Product Created Successfully"})),
        ),
        Err(err) => {
            tracing::warn!(%err, "product creation failed");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Error Creating Product"})),
            )
        }
    }
}

async fn update_product(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<ProductPatch>) -> Response {
    match s.products.update(&id, body).await {
        Ok(()) => Json(json!({"success": true})).into_response(),
        Err(CatalogError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(err) => {
            tracing::warn!(%err, "product update failed");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Error Updating Product"})),
            )
                .into_response()
        }
    }
}

async fn delete_product(State(s): State<AppState>, Path(id): Path<String>) -> Response {
    match s.products.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(CatalogError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

async fn create_order(State(s): State<AppState>, Json(req): Json<CheckoutRequest>) -> (StatusCode, Json<serde_json::Value>) {
    match s.orders.place_order(req).await {
        Ok(order_id) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "message": order_id})),
        ),
        Err(err) => {
            // every failure collapses to the same client shape; the cause stays in the log
            tracing::warn!(%err, "order creation failed");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Error Creating Order"})),
            )
        }
    }
}

async fn orders_by_email(State(s): State<AppState>, Query(p): Query<EmailParam>) -> Result<Json<Vec<Order>>, (StatusCode, String)> {
    s.orders
        .orders_for_email(&p.email)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    email: String,
    status: OrderStatus,
}

async fn update_order_status(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<StatusUpdate>) -> Response {
    match s.orders.update_status(&body.email, &id, body.status).await {
        Ok(()) => Json(json!({"success": true})).into_response(),
        Err(OrderError::Access(err)) => Json(json!({"error": err.to_string()})).into_response(),
        Err(OrderError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(OrderError::Transition(err)) => (StatusCode::CONFLICT, err.to_string()).into_response(),
        Err(err) => {
            tracing::error!(%err, "status update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()).into_response()
        }
    }
}

// Admin reads return the error in the body, never a transport error; callers
// check for the `error` key before treating the payload as data.
async fn all_orders(State(s): State<AppState>, Query(p): Query<EmailParam>) -> Json<serde_json::Value> {
    match s.orders.all_orders(&p.email).await {
        Ok(orders) => Json(json!(orders)),
        Err(OrderError::Access(err)) => Json(json!({"error": err.to_string()})),
        Err(err) => {
            tracing::error!(%err, "admin order read failed");
            Json(json!({"error": "Internal error"}))
        }
    }
}

async fn all_users(State(s): State<AppState>, Query(p): Query<EmailParam>) -> Json<serde_json::Value> {
    match s.users.all(&p.email).await {
        Ok(users) => Json(json!(users)),
        Err(UserError::Access(err)) => Json(json!({"error": err.to_string()})),
        Err(err) => {
            tracing::error!(%err, "admin user read failed");
            Json(json!({"error": "Internal error"}))
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

async fn register_user(State(s): State<AppState>, Json(req): Json<RegisterUser>) -> Response {
    match s.users.ensure(req).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => {
            tracing::warn!(%err, "user registration failed");
            (StatusCode::BAD_REQUEST, "Invalid user".to_string()).into_response()
        }
    }
}

async fn get_user(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<User>, (StatusCode, String)> {
    match s.users.get(&id).await {
        Ok(user) => Ok(Json(user)),
        Err(UserError::NotFound) => Err((StatusCode::NOT_FOUND, "Not found".to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

async fn profile_complete(State(s): State<AppState>, Path(id): Path<String>) -> Response {
    match s.users.needs_profile_completion(&id).await {
        Ok(needed) => Json(json!({"needsProfileCompletion": needed})).into_response(),
        Err(UserError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PhoneUpdate {
    phone: String,
}

async fn set_phone(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<PhoneUpdate>) -> Response {
    match s.users.set_phone(&id, body.phone).await {
        Ok(()) => Json(json!({"success": true})).into_response(),
        Err(UserError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(err @ UserError::InvalidPhone) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct VehicleUpdate {
    #[serde(rename = "vehicleNumber")]
    vehicle_number: String,
}

async fn set_vehicle(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<VehicleUpdate>) -> Response {
    match s.users.set_vehicle_number(&id, body.vehicle_number).await {
        Ok(()) => Json(json!({"success": true})).into_response(),
        Err(UserError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        Err(err @ UserError::InvalidVehicleNumber) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
