use chrono::NaiveDate;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json};
use rocket::{Build, Rocket, State};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::date::{decode_date, encode_date};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult, Message};
use crate::store::ClassStore;
use crate::validate::{validate_class, ValidationError};

pub type ClassId = i64;

const INVALID_BODY: &str = "Invalid request body for class";
const INVALID_ID: &str = "Invalid class ID";
const NOT_FOUND: &str = "Class does not exist";

#[derive(FromRow, Clone, Debug, PartialEq)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: u32,
}

/// Request body of POST and PUT. It has no `id`, so one sent by the client is dropped.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct ClassPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

// empty date strings count as absent
fn date_field(field: &'static str, text: Option<String>) -> Result<Option<NaiveDate>, ValidationError> {
    match text.filter(|s| !s.is_empty()) {
        Some(s) => decode_date(field, &s).map(Some),
        None => Ok(None),
    }
}

impl ClassPayload {
    pub fn into_class(self) -> Result<Class, ValidationError> {
        let start_date = date_field("start_date", self.start_date)?.ok_or(ValidationError::InvalidDate("start_date"))?;
        let end_date = date_field("end_date", self.end_date)?.ok_or(ValidationError::InvalidDate("end_date"))?;
        Ok(Class {
            id: 0,
            name: self.name.unwrap_or_default(),
            start_date,
            end_date,
            capacity: self.capacity.unwrap_or_default(),
        })
    }
    /// Fields present in the payload replace the stored ones, `id` is kept.
    pub fn merge_into(self, mut class: Class) -> Result<Class, ValidationError> {
        if let Some(name) = self.name {
            class.name = name;
        }
        if let Some(start_date) = date_field("start_date", self.start_date)? {
            class.start_date = start_date;
        }
        if let Some(end_date) = date_field("end_date", self.end_date)? {
            class.end_date = end_date;
        }
        if let Some(capacity) = self.capacity {
            class.capacity = capacity;
        }
        Ok(class)
    }
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct ClassResponse {
    pub id: ClassId,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub capacity: u32,
}
impl From<&Class> for ClassResponse {
    fn from(class: &Class) -> Self {
        Self {
            id: class.id,
            name: class.name.clone(),
            start_date: encode_date(class.start_date),
            end_date: encode_date(class.end_date),
            capacity: class.capacity,
        }
    }
}

pub async fn list<S: ClassStore + ?Sized>(store: &S) -> ApiResult<Vec<ClassResponse>> {
    let classes = store.list_classes().await?;
    Ok(classes.iter().map(ClassResponse::from).collect())
}
pub async fn add<S: ClassStore + ?Sized>(store: &S, payload: ClassPayload) -> ApiResult<ClassResponse> {
    let class = payload.into_class()?;
    validate_class(&class)?;
    let class = store.create_class(&class).await?;
    info!("Class created, id: {}", class.id);
    Ok(ClassResponse::from(&class))
}
pub async fn fetch<S: ClassStore + ?Sized>(store: &S, id: ClassId) -> ApiResult<Class> {
    store.find_class(id).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))
}
/// `stored` is the record fetched for the request path.
pub async fn update<S: ClassStore + ?Sized>(store: &S, stored: Class, payload: ClassPayload) -> ApiResult<ClassResponse> {
    let class = payload.merge_into(stored)?;
    validate_class(&class)?;
    let class = store.save_class(&class).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))?;
    Ok(ClassResponse::from(&class))
}
pub async fn remove<S: ClassStore + ?Sized>(store: &S, id: ClassId) -> ApiResult<Message> {
    let class = fetch(store, id).await?;
    store.delete_class(class.id).await.map_err(|e| ApiError::from_lookup(e, NOT_FOUND))?;
    info!("Class removed, id: {id}");
    Ok(Message::new("Class removed"))
}

fn class_id(id: Result<ClassId, &str>) -> ApiResult<ClassId> {
    id.map_err(|_| ApiError::InvalidId(INVALID_ID))
}
fn class_payload(payload: Result<Json<ClassPayload>, json::Error<'_>>) -> ApiResult<ClassPayload> {
    payload.map(Json::into_inner).map_err(|e| {
        warn!("Error parsing JSON for class: {e:?}");
        ApiError::InvalidBody(INVALID_BODY)
    })
}

#[get("/classes")]
async fn get_classes(db: &State<DbPool>) -> ApiResult<Json<Vec<ClassResponse>>> {
    list(db.inner()).await.map(Json)
}
#[post("/classes", data = "<payload>")]
async fn post_class(payload: Result<Json<ClassPayload>, json::Error<'_>>, db: &State<DbPool>) -> ApiResult<Custom<Json<ClassResponse>>> {
    let class = add(db.inner(), class_payload(payload)?).await?;
    Ok(Custom(Status::Created, Json(class)))
}
#[get("/classes/<id>")]
async fn get_class(id: Result<ClassId, &str>, db: &State<DbPool>) -> ApiResult<Json<ClassResponse>> {
    let class = fetch(db.inner(), class_id(id)?).await?;
    Ok(Json(ClassResponse::from(&class)))
}
#[put("/classes/<id>", data = "<payload>")]
async fn put_class(id: Result<ClassId, &str>, payload: Result<Json<ClassPayload>, json::Error<'_>>, db: &State<DbPool>) -> ApiResult<Json<ClassResponse>> {
    // a missing class wins over a bad body
    let stored = fetch(db.inner(), class_id(id)?).await?;
    let class = update(db.inner(), stored, class_payload(payload)?).await?;
    Ok(Json(class))
}
#[delete("/classes/<id>")]
async fn delete_class(id: Result<ClassId, &str>, db: &State<DbPool>) -> ApiResult<Json<Message>> {
    remove(db.inner(), class_id(id)?).await.map(Json)
}

pub fn extend(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/", routes![
            get_classes,
            post_class,
            get_class,
            put_class,
            delete_class,
        ])
}
