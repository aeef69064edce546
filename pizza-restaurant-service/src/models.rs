use diesel::prelude::*;
use utoipa::ToSchema;

use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::validation::Price;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    /// Comma-joined ingredient list, stored as a single text column.
    pub ingredients: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = pizzas)]
pub struct NewPizza<'a> {
    pub name: &'a str,
    pub ingredients: &'a str,
}

/// A pizza offered by a restaurant at a given price.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, ToSchema)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

/// Insert form of [`RestaurantPizza`]. The price can only come from
/// [`crate::validation::validate_price`], so an out-of-range row is never built.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    price: i32,
    pizza_id: i32,
    restaurant_id: i32,
}

impl NewRestaurantPizza {
    pub fn new(price: Price, pizza_id: i32, restaurant_id: i32) -> Self {
        Self {
            price: price.value(),
            pizza_id,
            restaurant_id,
        }
    }

    #[cfg(test)]
    pub(crate) fn price(&self) -> i32 {
        self.price
    }

    #[cfg(test)]
    pub(crate) fn pizza_id(&self) -> i32 {
        self.pizza_id
    }

    #[cfg(test)]
    pub(crate) fn restaurant_id(&self) -> i32 {
        self.restaurant_id
    }
}
