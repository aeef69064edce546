use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::{ApiError, ApiErrorResponse, ApiErrorsResponse};
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::serializer;
use crate::store::{self, DbPool};
use crate::validation::{RestaurantPizzaPayload, ValidationError};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
        .route("/pizzas", get(list_pizzas))
        .route("/restaurant_pizzas", post(create_restaurant_pizza))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting page", body = String, content_type = "text/html"),
    ),
    tag = "index"
)]
pub async fn index() -> Html<&'static str> {
    Html("<h1>Code challenge</h1>")
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants, without their pizzas", body = [Restaurant]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let restaurants = store::with_connection(&state.pool, |conn| {
        Ok(store::list_restaurants(conn)?)
    })
    .await
    .map_err(ApiError::Internal)?;

    Ok(Json(Value::Array(
        restaurants
            .iter()
            .map(|r| {
                Value::Object(serializer::restaurant_to_json(
                    r,
                    None,
                    &[serializer::RestaurantField::RestaurantPizzas],
                ))
            })
            .collect(),
    )))
}

/// Any run of digits is a restaurant id. One too large for the id column
/// cannot name a stored restaurant, so it is reported as not found.
fn restaurant_id_from_path(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::UnknownPath)?;
    let digits = raw.strip_prefix('-').unwrap_or(&raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::UnknownPath);
    }
    raw.parse().map_err(|_| ApiError::RestaurantNotFound)
}

/// Response shape of `GET /restaurants/{id}`.
#[derive(ToSchema)]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizza>,
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with its restaurant pizzas", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let restaurant_id = restaurant_id_from_path(path)?;

    let found = store::with_connection(&state.pool, move |conn| {
        let Some(restaurant) = store::find_restaurant(conn, restaurant_id)? else {
            return Ok(None);
        };
        let restaurant_pizzas = store::restaurant_pizzas_of(conn, &restaurant)?;
        Ok(Some((restaurant, restaurant_pizzas)))
    })
    .await
    .map_err(ApiError::Internal)?;

    let (restaurant, restaurant_pizzas) = found.ok_or(ApiError::RestaurantNotFound)?;

    Ok(Json(Value::Object(serializer::restaurant_to_json(
        &restaurant,
        Some(restaurant_pizzas.as_slice()),
        &[],
    ))))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its restaurant pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let restaurant_id = restaurant_id_from_path(path)?;

    let deleted = store::with_connection(&state.pool, move |conn| {
        Ok(store::delete_restaurant(conn, restaurant_id)?)
    })
    .await
    .map_err(ApiError::Internal)?;

    if !deleted {
        return Err(ApiError::RestaurantNotFound);
    }
    info!(restaurant_id, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "All pizzas", body = [Pizza]),
        (status = 500, description = "Store failure", body = ApiErrorResponse),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pizzas = store::with_connection(&state.pool, |conn| Ok(store::list_pizzas(conn)?))
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list pizzas");
            ApiError::PizzaListing(e)
        })?;
    info!(count = pizzas.len(), "pizzas retrieved");

    Ok(Json(Value::Array(
        pizzas
            .iter()
            .map(|p| Value::Object(serializer::pizza_to_json(p)))
            .collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = RestaurantPizzaPayload,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizza),
        (status = 400, description = "Missing field or price outside 1..=30", body = ApiErrorsResponse),
        (status = 500, description = "Store failure, e.g. unknown pizza or restaurant", body = ApiErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<RestaurantPizzaPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_restaurant_pizza = payload
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
        .and_then(|Json(payload)| payload.validate())
        .inspect_err(|e| warn!(reason = %e, "rejected restaurant pizza"))?;

    let created = store::with_connection(&state.pool, move |conn| {
        Ok(store::insert_restaurant_pizza(conn, &new_restaurant_pizza)?)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "failed to create restaurant pizza");
        ApiError::Creation(e)
    })?;
    info!(id = created.id, "restaurant pizza created");

    Ok((
        StatusCode::CREATED,
        Json(Value::Object(serializer::restaurant_pizza_to_json(
            &created,
            Default::default(),
            &[],
        ))),
    ))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index,
        list_restaurants,
        get_restaurant,
        delete_restaurant,
        list_pizzas,
        create_restaurant_pizza,
    ),
    components(
        schemas(
            Restaurant,
            RestaurantDetail,
            Pizza,
            RestaurantPizza,
            RestaurantPizzaPayload,
            ApiErrorResponse,
            ApiErrorsResponse
        )
    ),
    tags(
        (name = "index", description = "Landing page"),
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Pizza offerings and prices")
    ),
    info(
        title = "Pizza Restaurant API",
        description = "Restaurants, pizzas and the prices restaurants sell them at",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
