#[macro_use] extern crate rocket;

use rocket::figment::providers::Env;
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde::Deserialize;
use crate::db::DbPoolFairing;
use crate::error::{Message, GENERIC_ERROR};
use crate::fairings::{JsonContentType, RequestLogger};

#[cfg(test)]
mod tests;
mod bookings;
mod classes;
mod date;
mod db;
mod error;
mod fairings;
mod store;
mod validate;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) database_url: String,
    pub(crate) max_connections: u32,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://dancestudio.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Rocket.toml and ROCKET_* variables, then DANCESTUDIO_* variables on top.
fn figment() -> Figment {
    rocket::Config::figment()
        .merge(Env::prefixed("DANCESTUDIO_").global())
}

#[catch(500)]
fn internal_error() -> Json<Message> {
    Json(Message::new(GENERIC_ERROR))
}
#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> Json<Message> {
    Json(Message::new(status.reason_lossy()))
}

#[launch]
fn rocket() -> _ {
    let rocket = rocket::custom(figment())
        .attach(RequestLogger)
        .attach(JsonContentType)
        .attach(DbPoolFairing())
        .register("/", catchers![
            internal_error,
            default_catcher,
        ]);
    let rocket = classes::extend(rocket);
    bookings::extend(rocket)
}
