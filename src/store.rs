use crate::bookings::{Booking, BookingId};
use crate::classes::{Class, ClassId};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("SQL error: {0}")]
    Database(sqlx::Error),
}
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            err => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// `create_class` ignores `class.id` and returns the record with the id assigned by the store.
#[rocket::async_trait]
pub trait ClassStore: Send + Sync {
    async fn list_classes(&self) -> StoreResult<Vec<Class>>;
    async fn find_class(&self, id: ClassId) -> StoreResult<Class>;
    async fn create_class(&self, class: &Class) -> StoreResult<Class>;
    async fn save_class(&self, class: &Class) -> StoreResult<Class>;
    async fn delete_class(&self, id: ClassId) -> StoreResult<()>;
}

#[rocket::async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>>;
    async fn find_booking(&self, id: BookingId) -> StoreResult<Booking>;
    async fn create_booking(&self, booking: &Booking) -> StoreResult<Booking>;
    async fn save_booking(&self, booking: &Booking) -> StoreResult<Booking>;
    async fn delete_booking(&self, id: BookingId) -> StoreResult<()>;
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
