use std::str::FromStr;
use anyhow::Context;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Build, Orbit, Rocket};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use crate::bookings::{Booking, BookingId};
use crate::classes::{Class, ClassId};
use crate::store::{BookingStore, ClassStore, StoreError, StoreResult};
use crate::AppConfig;

static MIGRATOR: Migrator = sqlx::migrate!("db/migrations");

pub struct DbPool(pub SqlitePool);

async fn open_pool(cfg: &AppConfig) -> anyhow::Result<SqlitePool> {
    let database_url = if cfg!(test) {
        "sqlite::memory:"
    } else {
        cfg.database_url.as_str()
    };
    info!("Opening database: {database_url}");
    let in_memory = database_url.contains(":memory:");
    let opts = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url: {database_url}"))?
        .create_if_missing(true);
    let pool = if in_memory {
        // every connection gets its own memory database, keep exactly one alive
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_with(opts.journal_mode(SqliteJournalMode::Wal))
            .await
    }.with_context(|| format!("cannot open database: {database_url}"))?;

    MIGRATOR.run(&pool).await.context("database migration failed")?;
    info!("Migrations applied successfully!");
    Ok(pool)
}

pub struct DbPoolFairing();
#[rocket::async_trait]
impl Fairing for DbPoolFairing {
    fn info(&self) -> Info {
        Info {
            name: "SQLite Database Pool with Migrations",
            kind: Kind::Ignite | Kind::Shutdown,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let cfg = match rocket.figment().extract::<AppConfig>() {
            Ok(cfg) => cfg,
            Err(err) => {
                error!("Invalid configuration: {err}");
                return Err(rocket);
            }
        };
        match open_pool(&cfg).await {
            Ok(pool) => Ok(rocket.manage(DbPool(pool))),
            Err(err) => {
                error!("Database connection error: {err:#}");
                Err(rocket)
            }
        }
    }

    async fn on_shutdown(&self, rocket: &Rocket<Orbit>) {
        if let Some(db) = rocket.state::<DbPool>() {
            info!("Disconnecting from db");
            db.0.close().await;
        }
    }
}

#[rocket::async_trait]
impl ClassStore for DbPool {
    async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>("SELECT * FROM classes ORDER BY id")
            .fetch_all(&self.0)
            .await?;
        Ok(classes)
    }
    async fn find_class(&self, id: ClassId) -> StoreResult<Class> {
        let class = sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id=?")
            .bind(id)
            .fetch_one(&self.0)
            .await?;
        Ok(class)
    }
    async fn create_class(&self, class: &Class) -> StoreResult<Class> {
        let class = sqlx::query_as::<_, Class>("INSERT INTO classes(name, start_date, end_date, capacity) VALUES (?, ?, ?, ?) RETURNING *")
            .bind(&class.name)
            .bind(class.start_date)
            .bind(class.end_date)
            .bind(class.capacity)
            .fetch_one(&self.0)
            .await?;
        Ok(class)
    }
    async fn save_class(&self, class: &Class) -> StoreResult<Class> {
        let class = sqlx::query_as::<_, Class>("UPDATE classes SET name=?, start_date=?, end_date=?, capacity=? WHERE id=? RETURNING *")
            .bind(&class.name)
            .bind(class.start_date)
            .bind(class.end_date)
            .bind(class.capacity)
            .bind(class.id)
            .fetch_one(&self.0)
            .await?;
        Ok(class)
    }
    async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        let res = sqlx::query("DELETE FROM classes WHERE id=?")
            .bind(id)
            .execute(&self.0)
            .await?;
        if res.rows_affected() == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[rocket::async_trait]
impl BookingStore for DbPool {
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY id")
            .fetch_all(&self.0)
            .await?;
        Ok(bookings)
    }
    async fn find_booking(&self, id: BookingId) -> StoreResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id=?")
            .bind(id)
            .fetch_one(&self.0)
            .await?;
        Ok(booking)
    }
    async fn create_booking(&self, booking: &Booking) -> StoreResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>("INSERT INTO bookings(name, booking_date, class_id) VALUES (?, ?, ?) RETURNING *")
            .bind(&booking.name)
            .bind(booking.booking_date)
            .bind(booking.class_id)
            .fetch_one(&self.0)
            .await?;
        Ok(booking)
    }
    async fn save_booking(&self, booking: &Booking) -> StoreResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>("UPDATE bookings SET name=?, booking_date=?, class_id=? WHERE id=? RETURNING *")
            .bind(&booking.name)
            .bind(booking.booking_date)
            .bind(booking.class_id)
            .bind(booking.id)
            .fetch_one(&self.0)
            .await?;
        Ok(booking)
    }
    async fn delete_booking(&self, id: BookingId) -> StoreResult<()> {
        let res = sqlx::query("DELETE FROM bookings WHERE id=?")
            .bind(id)
            .execute(&self.0)
            .await?;
        if res.rows_affected() == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}
