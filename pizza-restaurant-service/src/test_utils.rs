use axum::Router;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use tempfile::TempDir;

use crate::handlers::{router, AppState};
use crate::models::{NewPizza, NewRestaurant, Pizza, Restaurant};
use crate::store::{self, DbPool};

/// A migrated SQLite database in its own temp directory, removed on drop.
pub struct TestDatabase {
    pub pool: DbPool,
    _dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        let pool = store::establish_pool(&path.to_string_lossy(), 2)
            .expect("Failed to open test database");
        store::run_migrations(&mut pool.get().expect("Failed to get connection"))
            .expect("Failed to run migrations");
        TestDatabase { pool, _dir: dir }
    }

    pub fn conn(&self) -> PooledConnection<ConnectionManager<SqliteConnection>> {
        self.pool.get().expect("Failed to get connection")
    }

    pub fn router(&self) -> Router {
        router(AppState {
            pool: self.pool.clone(),
        })
    }
}

pub fn seed_restaurant(conn: &mut SqliteConnection, name: &str) -> Restaurant {
    store::insert_restaurant(
        conn,
        &NewRestaurant {
            name,
            address: "123 Test Street",
        },
    )
    .expect("Failed to insert restaurant")
}

pub fn seed_pizza(conn: &mut SqliteConnection, name: &str) -> Pizza {
    store::insert_pizza(
        conn,
        &NewPizza {
            name,
            ingredients: "Dough, Tomato Sauce, Cheese",
        },
    )
    .expect("Failed to insert pizza")
}
