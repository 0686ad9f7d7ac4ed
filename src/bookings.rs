use chrono::NaiveDate;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json};
use rocket::{Build, Rocket, State};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::classes::ClassId;
use crate::date::{decode_date, encode_date};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult, Message};
use crate::store::{BookingStore, ClassStore};
use crate::validate::{validate_booking, ValidationError};

pub type BookingId = i64;

const INVALID_BODY: &str = "Invalid request body for booking";
const INVALID_ID: &str = "Invalid booking ID";
const NOT_FOUND: &str = "Booking does not exist";

#[derive(FromRow, Clone, Debug, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub booking_date: NaiveDate,
    pub class_id: ClassId,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct BookingPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
}
impl BookingPayload {
    /// A missing `class_id` is left as 0, which never resolves to a class.
    pub fn into_booking(self) -> Result<Booking, ValidationError> {
        let booking_date = self.booking_date.ok_or(ValidationError::InvalidDate("booking_date"))?;
        Ok(Booking {
            id: 0,
            name: self.name.unwrap_or_default(),
            booking_date: decode_date("booking_date", &booking_date)?,
            class_id: self.class_id.unwrap_or_default(),
        })
    }
    pub fn merge_into(self, mut booking: Booking) -> Result<Booking, ValidationError> {
        if let Some(name) = self.name {
            booking.name = name;
        }
        if let Some(booking_date) = self.booking_date {
            booking.booking_date = decode_date("booking_date", &booking_date)?;
        }
        if let Some(class_id) = self.class_id {
            booking.class_id = class_id;
        }
        Ok(booking)
    }
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct BookingResponse {
    pub id: BookingId,
    pub name: String,
    pub booking_date: String,
    pub class_id: ClassId,
}
impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            name: booking.name.clone(),
            booking_date: encode_date(booking.booking_date),
            class_id: booking.class_id,
        }
    }
}

pub async fn list<S: BookingStore + ?Sized>(store: &S) -> ApiResult<Vec<BookingResponse>> {
    let bookings = store.list_bookings().await?;
    Ok(bookings.iter().map(BookingResponse::from).collect())
}
pub async fn add<S>(store: &S, payload: BookingPayload) -> ApiResult<BookingResponse>
where
    S: BookingStore + ClassStore + ?Sized,
{
    let booking = payload.into_booking()?;
    validate_booking(&booking, store).await?;
    let booking = store.create_booking(&booking).await?;
    info!("Booking created, id: {}, class id: {}", booking.id, booking.class_id);
    Ok(BookingResponse::from(&booking))
}
pub async fn fetch<S: BookingStore + ?Sized>(store: &S, id: BookingId) -> ApiResult<Booking> {
    store.find_booking(id).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))
}
/// The merged booking is checked against its class again, `class_id` may have changed.
pub async fn update<S>(store: &S, stored: Booking, payload: BookingPayload) -> ApiResult<BookingResponse>
where
    S: BookingStore + ClassStore + ?Sized,
{
    let booking = payload.merge_into(stored)?;
    validate_booking(&booking, store).await?;
    let booking = store.save_booking(&booking).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))?;
    Ok(BookingResponse::from(&booking))
}
pub async fn remove<S: BookingStore + ?Sized>(store: &S, id: BookingId) -> ApiResult<Message> {
    let booking = fetch(store, id).await?;
    store.delete_booking(booking.id).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))?;
    info!("Booking removed, id: {id}");
    Ok(Message::new("Booking removed"))
}

fn booking_id(id: Result<BookingId, &str>) -> ApiResult<BookingId> {
    id.map_err(|_| ApiError::InvalidId(INVALID_ID))
}
fn booking_payload(payload: Result<Json<BookingPayload>, json::Error<'_>>) -> ApiResult<BookingPayload> {
    payload.map(Json::into_inner).map_err(|e| {
        warn!("Error parsing JSON for booking: {e:?}");
        ApiError::InvalidBody(INVALID_BODY)
    })
}

#[get("/bookings")]
async fn get_bookings(db: &State<DbPool>) -> ApiResult<Json<Vec<BookingResponse>>> {
    list(db.inner()).await.map(Json)
}
#[post("/bookings", data = "<payload>")]
async fn post_booking(payload: Result<Json<BookingPayload>, json::Error<'_>>, db: &State<DbPool>) -> ApiResult<Custom<Json<BookingResponse>>> {
    let booking = add(db.inner(), booking_payload(payload)?).await?;
    Ok(Custom(Status::Created, Json(booking)))
}
#[get("/bookings/<id>")]
async fn get_booking(id: Result<BookingId, &str>, db: &State<DbPool>) -> ApiResult<Json<BookingResponse>> {
    let booking = fetch(db.inner(), booking_id(id)?).await?;
    Ok(Json(BookingResponse::from(&booking)))
}
#[put("/bookings/<id>", data = "<payload>")]
async fn put_booking(id: Result<BookingId, &str>, payload: Result<Json<BookingPayload>, json::Error<'_>>, db: &State<DbPool>) -> ApiResult<Json<BookingResponse>> {
    let stored = fetch(db.inner(), booking_id(id)?).await?;
    let booking = update(db.inner(), stored, booking_payload(payload)?).await?;
    Ok(Json(booking))
}
#[delete("/bookings/<id>")]
async fn delete_booking(id: Result<BookingId, &str>, db: &State<DbPool>) -> ApiResult<Json<Message>> {
    remove(db.inner(), booking_id(id)?).await.map(Json)
}

pub fn extend(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/", routes![
            get_bookings,
            post_booking,
            get_booking,
            put_booking,
            delete_booking,
        ])
}
