use diesel::prelude::*;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::store;
use crate::validation::{validate_price, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Query(#[from] diesel::result::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const OFFERINGS: &[(usize, usize, i64)] = &[(0, 0, 1), (1, 1, 4), (2, 2, 5), (0, 2, 12)];

/// Replaces the contents of every table with a small fixed sample set.
pub fn load_sample_data(conn: &mut SqliteConnection) -> Result<SeedSummary, SeedError> {
    conn.transaction::<_, SeedError, _>(|conn| {
        store::clear_all(conn)?;

        let restaurants = RESTAURANTS
            .iter()
            .map(|&(name, address)| store::insert_restaurant(conn, &NewRestaurant { name, address }))
            .collect::<QueryResult<Vec<_>>>()?;
        let pizzas = PIZZAS
            .iter()
            .map(|&(name, ingredients)| store::insert_pizza(conn, &NewPizza { name, ingredients }))
            .collect::<QueryResult<Vec<_>>>()?;

        for &(restaurant, pizza, price) in OFFERINGS {
            let new = NewRestaurantPizza::new(
                validate_price(price)?,
                pizzas[pizza].id,
                restaurants[restaurant].id,
            );
            store::insert_restaurant_pizza(conn, &new)?;
        }

        let summary = SeedSummary {
            restaurants: restaurants.len(),
            pizzas: pizzas.len(),
            restaurant_pizzas: OFFERINGS.len(),
        };
        info!(?summary, "sample data loaded");
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDatabase;

    #[test]
    fn test_seeding_twice_replaces_data() {
        let db = TestDatabase::new();
        let conn = &mut db.conn();

        let first = load_sample_data(conn).unwrap();
        let second = load_sample_data(conn).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            second,
            SeedSummary {
                restaurants: 3,
                pizzas: 3,
                restaurant_pizzas: 4,
            }
        );

        let restaurants = store::list_restaurants(conn).unwrap();
        assert_eq!(restaurants.len(), 3);
        assert_eq!(restaurants[0].id, 1);
        assert_eq!(restaurants[0].name, "Karen's Pizza Shack");

        let karen = &restaurants[0];
        let offered = store::restaurant_pizzas_of(conn, karen).unwrap();
        assert_eq!(offered.len(), 2);
        assert_eq!(store::list_pizzas(conn).unwrap().len(), 3);
    }
}
