use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Query(#[from] diesel::result::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("database worker failed: {0}")]
    Worker(String),
}

/// Applied to every connection the pool hands out. Foreign keys are off by
/// default in SQLite and have to be enabled per connection.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool(database_url: &str, max_size: u32) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    Ok(pool)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(())
}

/// Checks a connection out of the pool and runs `f` on a blocking worker.
/// The connection goes back to the pool when `f` returns, whatever the outcome.
pub async fn with_connection<T, F>(pool: &DbPool, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut *conn)
    })
    .await
    .map_err(|e| StoreError::Worker(e.to_string()))?
}

pub fn list_restaurants(conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    restaurants::table
        .order(restaurants::id)
        .select(Restaurant::as_select())
        .load(conn)
}

pub fn find_restaurant(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Restaurant>> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()
}

pub fn restaurant_pizzas_of(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> QueryResult<Vec<RestaurantPizza>> {
    RestaurantPizza::belonging_to(restaurant)
        .order(restaurant_pizzas::id)
        .select(RestaurantPizza::as_select())
        .load(conn)
}

/// Removes the restaurant and every restaurant pizza it owns. Returns
/// `false` when no restaurant has the given id.
pub fn delete_restaurant(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
    conn.transaction(|conn| {
        diesel::delete(restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(id)))
            .execute(conn)?;
        let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
        Ok(deleted > 0)
    })
}

pub fn list_pizzas(conn: &mut SqliteConnection) -> QueryResult<Vec<Pizza>> {
    pizzas::table
        .order(pizzas::id)
        .select(Pizza::as_select())
        .load(conn)
}

pub fn insert_restaurant_pizza(
    conn: &mut SqliteConnection,
    new_restaurant_pizza: &NewRestaurantPizza,
) -> QueryResult<RestaurantPizza> {
    diesel::insert_into(restaurant_pizzas::table)
        .values(new_restaurant_pizza)
        .returning(RestaurantPizza::as_returning())
        .get_result(conn)
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    new_restaurant: &NewRestaurant<'_>,
) -> QueryResult<Restaurant> {
    diesel::insert_into(restaurants::table)
        .values(new_restaurant)
        .returning(Restaurant::as_returning())
        .get_result(conn)
}

pub fn insert_pizza(conn: &mut SqliteConnection, new_pizza: &NewPizza<'_>) -> QueryResult<Pizza> {
    diesel::insert_into(pizzas::table)
        .values(new_pizza)
        .returning(Pizza::as_returning())
        .get_result(conn)
}

/// Empties all three tables, dependents first.
pub fn clear_all(conn: &mut SqliteConnection) -> QueryResult<()> {
    diesel::delete(restaurant_pizzas::table).execute(conn)?;
    diesel::delete(restaurants::table).execute(conn)?;
    diesel::delete(pizzas::table).execute(conn)?;
    Ok(())
}
