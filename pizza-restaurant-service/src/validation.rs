use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::NewRestaurantPizza;

pub const PRICE_MIN: i64 = 1;
pub const PRICE_MAX: i64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("price must be between {min} and {max}, got {0}", min = PRICE_MIN, max = PRICE_MAX)]
    PriceOutOfRange(i64),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// A restaurant pizza price known to lie in `PRICE_MIN..=PRICE_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i32);

impl Price {
    pub fn value(self) -> i32 {
        self.0
    }
}

pub fn validate_price(value: i64) -> Result<Price, ValidationError> {
    if !(PRICE_MIN..=PRICE_MAX).contains(&value) {
        return Err(ValidationError::PriceOutOfRange(value));
    }
    i32::try_from(value)
        .map(Price)
        .map_err(|_| ValidationError::PriceOutOfRange(value))
}

/// Body of `POST /restaurant_pizzas`. Fields are optional so that a missing
/// one is reported as a validation failure rather than a decode error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RestaurantPizzaPayload {
    /// Price in whole currency units, 1 to 30 inclusive
    pub price: Option<i64>,
    /// Existing pizza id
    pub pizza_id: Option<i32>,
    /// Existing restaurant id
    pub restaurant_id: Option<i32>,
}

impl RestaurantPizzaPayload {
    pub fn validate(self) -> Result<NewRestaurantPizza, ValidationError> {
        let price = self.price.ok_or(ValidationError::MissingField("price"))?;
        let pizza_id = self
            .pizza_id
            .ok_or(ValidationError::MissingField("pizza_id"))?;
        let restaurant_id = self
            .restaurant_id
            .ok_or(ValidationError::MissingField("restaurant_id"))?;

        Ok(NewRestaurantPizza::new(
            validate_price(price)?,
            pizza_id,
            restaurant_id,
        ))
    }
}
