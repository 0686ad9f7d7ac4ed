use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use crate::bookings::Booking;
use crate::classes::Class;
use crate::store::{ClassStore, StoreError};

#[derive(thiserror::Error, PartialEq, Clone, Debug)]
pub enum ValidationError {
    #[error("Invalid capacity in payload, must be over 0")]
    InvalidCapacity,
    #[error("Invalid {0} in payload")]
    InvalidDate(&'static str),
    #[error("Unrecognized {field} in payload: {source}")]
    MalformedDate {
        field: &'static str,
        source: chrono::ParseError,
    },
    #[error("No such class")]
    NoSuchClass,
    #[error("Booked date outside class start and end")]
    OutsideClassWindow,
}

#[derive(thiserror::Error, Debug)]
pub enum BookingCheckError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(StoreError),
}

pub fn validate_class(class: &Class) -> Result<(), ValidationError> {
    if class.capacity < 1 {
        return Err(ValidationError::InvalidCapacity);
    }
    Ok(())
}

fn midnight(date: chrono::NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Both the first and the last day of the class are bookable.
/// The class end is pushed to the end of its day and the booking to its midday,
/// then `start < booking < end` is checked strictly.
pub fn check_booking_window(booking: &Booking, class: &Class) -> Result<(), ValidationError> {
    let class_start = midnight(class.start_date);
    let class_end = midnight(class.end_date).checked_add_signed(TimeDelta::hours(24));
    let Some(booked) = midnight(booking.booking_date).checked_add_signed(TimeDelta::hours(12)) else {
        return Err(ValidationError::OutsideClassWindow);
    };
    // no representable end means the class runs to the end of the calendar
    let before_end = class_end.is_none_or(|end| booked < end);
    if booked > class_start && before_end {
        Ok(())
    } else {
        Err(ValidationError::OutsideClassWindow)
    }
}

pub async fn validate_booking<S>(booking: &Booking, classes: &S) -> Result<Class, BookingCheckError>
where
    S: ClassStore + ?Sized,
{
    let class = match classes.find_class(booking.class_id).await {
        Ok(class) => class,
        Err(StoreError::NotFound) => {
            warn!("Tried to book with non-existing class id: {}", booking.class_id);
            return Err(ValidationError::NoSuchClass.into());
        }
        Err(e) => return Err(BookingCheckError::Store(e)),
    };
    check_booking_window(booking, &class)?;
    Ok(class)
}
