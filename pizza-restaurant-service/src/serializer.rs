//! Record to JSON conversion.
//!
//! Each type declares its scalar fields explicitly. Relationships are left
//! out unless the caller passes them in, and are expanded one level only:
//! a nested record is always rendered with its own scalar-only form, which
//! keeps `Restaurant -> RestaurantPizza -> Restaurant` from looping.
//! Exclusions are applied last, so a caller can include a relationship and
//! still drop scalar keys.

use serde_json::{Map, Value};

use crate::models::{Pizza, Restaurant, RestaurantPizza};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantField {
    Id,
    Name,
    Address,
    RestaurantPizzas,
}

impl RestaurantField {
    pub fn key(self) -> &'static str {
        match self {
            RestaurantField::Id => "id",
            RestaurantField::Name => "name",
            RestaurantField::Address => "address",
            RestaurantField::RestaurantPizzas => "restaurant_pizzas",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantPizzaField {
    Id,
    Price,
    PizzaId,
    RestaurantId,
    Pizza,
    Restaurant,
}

impl RestaurantPizzaField {
    pub fn key(self) -> &'static str {
        match self {
            RestaurantPizzaField::Id => "id",
            RestaurantPizzaField::Price => "price",
            RestaurantPizzaField::PizzaId => "pizza_id",
            RestaurantPizzaField::RestaurantId => "restaurant_id",
            RestaurantPizzaField::Pizza => "pizza",
            RestaurantPizzaField::Restaurant => "restaurant",
        }
    }
}

/// A to-one relationship as seen by the serializer.
#[derive(Debug)]
pub enum ToOne<'a, T> {
    /// Not requested; the key is omitted.
    Omitted,
    /// Requested but no related record exists; rendered as `null`.
    Null,
    Record(&'a T),
}

impl<T> Default for ToOne<'_, T> {
    fn default() -> Self {
        ToOne::Omitted
    }
}

/// To-one relationships of a [`RestaurantPizza`] to include in its output.
#[derive(Debug, Default)]
pub struct RestaurantPizzaRelations<'a> {
    pub pizza: ToOne<'a, Pizza>,
    pub restaurant: ToOne<'a, Restaurant>,
}

/// `restaurant_pizzas` is included only when `Some`; each entry uses the
/// scalar-only restaurant pizza form.
pub fn restaurant_to_json(
    restaurant: &Restaurant,
    restaurant_pizzas: Option<&[RestaurantPizza]>,
    exclude: &[RestaurantField],
) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(RestaurantField::Id.key().into(), restaurant.id.into());
    map.insert(
        RestaurantField::Name.key().into(),
        restaurant.name.clone().into(),
    );
    map.insert(
        RestaurantField::Address.key().into(),
        restaurant.address.clone().into(),
    );

    if let Some(restaurant_pizzas) = restaurant_pizzas {
        let nested = restaurant_pizzas
            .iter()
            .map(|rp| Value::Object(restaurant_pizza_to_json(rp, Default::default(), &[])))
            .collect();
        map.insert(
            RestaurantField::RestaurantPizzas.key().into(),
            Value::Array(nested),
        );
    }

    for field in exclude {
        map.shift_remove(field.key());
    }
    map
}

pub fn pizza_to_json(pizza: &Pizza) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("id".into(), pizza.id.into());
    map.insert("name".into(), pizza.name.clone().into());
    map.insert("ingredients".into(), pizza.ingredients.clone().into());
    map
}

pub fn restaurant_pizza_to_json(
    restaurant_pizza: &RestaurantPizza,
    relations: RestaurantPizzaRelations<'_>,
    exclude: &[RestaurantPizzaField],
) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        RestaurantPizzaField::Id.key().into(),
        restaurant_pizza.id.into(),
    );
    map.insert(
        RestaurantPizzaField::Price.key().into(),
        restaurant_pizza.price.into(),
    );
    map.insert(
        RestaurantPizzaField::PizzaId.key().into(),
        restaurant_pizza.pizza_id.into(),
    );
    map.insert(
        RestaurantPizzaField::RestaurantId.key().into(),
        restaurant_pizza.restaurant_id.into(),
    );

    match relations.pizza {
        ToOne::Omitted => {}
        ToOne::Null => {
            map.insert(RestaurantPizzaField::Pizza.key().into(), Value::Null);
        }
        ToOne::Record(pizza) => {
            map.insert(
                RestaurantPizzaField::Pizza.key().into(),
                Value::Object(pizza_to_json(pizza)),
            );
        }
    }
    match relations.restaurant {
        ToOne::Omitted => {}
        ToOne::Null => {
            map.insert(RestaurantPizzaField::Restaurant.key().into(), Value::Null);
        }
        ToOne::Record(restaurant) => {
            map.insert(
                RestaurantPizzaField::Restaurant.key().into(),
                Value::Object(restaurant_to_json(restaurant, None, &[])),
            );
        }
    }

    for field in exclude {
        map.shift_remove(field.key());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn restaurant() -> Restaurant {
        Restaurant {
            id: 1,
            name: "Karen's Pizza Shack".to_string(),
            address: "address1".to_string(),
        }
    }

    fn pizza() -> Pizza {
        Pizza {
            id: 3,
            name: "Emma".to_string(),
            ingredients: "Dough, Tomato Sauce, Cheese".to_string(),
        }
    }

    fn restaurant_pizza() -> RestaurantPizza {
        RestaurantPizza {
            id: 7,
            price: 5,
            pizza_id: 3,
            restaurant_id: 1,
        }
    }

    #[test]
    fn test_restaurant_defaults_to_scalars() {
        let map = restaurant_to_json(&restaurant(), None, &[]);
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["id", "name", "address"]
        );
        assert_eq!(
            Value::Object(map),
            json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"})
        );
    }

    #[test]
    fn test_restaurant_includes_nested_scalars_only() {
        let nested = [restaurant_pizza()];
        let map = restaurant_to_json(&restaurant(), Some(&nested[..]), &[]);
        assert_eq!(
            Value::Object(map),
            json!({
                "id": 1,
                "name": "Karen's Pizza Shack",
                "address": "address1",
                "restaurant_pizzas": [
                    {"id": 7, "price": 5, "pizza_id": 3, "restaurant_id": 1}
                ]
            })
        );
    }

    #[test]
    fn test_restaurant_includes_empty_list() {
        let map = restaurant_to_json(&restaurant(), Some(&[][..]), &[]);
        assert_eq!(map["restaurant_pizzas"], json!([]));
    }

    #[test]
    fn test_exclude_applies_after_include() {
        let nested = [restaurant_pizza()];
        let map = restaurant_to_json(
            &restaurant(),
            Some(&nested[..]),
            &[RestaurantField::Address, RestaurantField::RestaurantPizzas],
        );
        assert_eq!(Value::Object(map), json!({"id": 1, "name": "Karen's Pizza Shack"}));
    }

    #[test]
    fn test_pizza_has_exactly_three_keys() {
        let map = pizza_to_json(&pizza());
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["id", "name", "ingredients"]
        );
    }

    #[test]
    fn test_restaurant_pizza_to_one_relations() {
        let restaurant = restaurant();
        let pizza = pizza();
        let map = restaurant_pizza_to_json(
            &restaurant_pizza(),
            RestaurantPizzaRelations {
                pizza: ToOne::Record(&pizza),
                restaurant: ToOne::Record(&restaurant),
            },
            &[RestaurantPizzaField::PizzaId],
        );
        assert_eq!(
            Value::Object(map),
            json!({
                "id": 7,
                "price": 5,
                "restaurant_id": 1,
                "pizza": {"id": 3, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"},
                "restaurant": {"id": 1, "name": "Karen's Pizza Shack", "address": "address1"}
            })
        );
    }

    #[test]
    fn test_restaurant_pizza_absent_relation_is_null() {
        let map = restaurant_pizza_to_json(
            &restaurant_pizza(),
            RestaurantPizzaRelations {
                pizza: ToOne::Null,
                ..Default::default()
            },
            &[],
        );
        assert_eq!(map["pizza"], Value::Null);
        assert!(!map.contains_key("restaurant"));
    }
}
