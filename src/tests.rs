use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::json;
use crate::bookings::BookingResponse;
use crate::classes::ClassResponse;
use crate::error::Message;

fn create_test_server() -> Client {
    Client::tracked(super::rocket()).unwrap()
}

fn create_summer_class(client: &Client) -> ClassResponse {
    let resp = client.post("/classes")
        .json(&json!({
            "id": 123,
            "name": "Class #1",
            "start_date": "2019-06-01",
            "end_date": "2019-08-31",
            "capacity": 20,
        }))
        .dispatch();
    assert_eq!(resp.status(), Status::Created);
    resp.into_json::<ClassResponse>().unwrap()
}

fn message(resp: rocket::local::blocking::LocalResponse) -> String {
    assert_eq!(resp.content_type(), Some(ContentType::JSON));
    resp.into_json::<Message>().unwrap().message
}

#[test]
fn get_classes_empty() {
    let client = create_test_server();
    let resp = client.get("/classes").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.content_type(), Some(ContentType::JSON));
    assert_eq!(resp.into_string().unwrap(), "[]");
}

#[test]
fn add_class() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    // sent id must not become the record identity
    assert_eq!(class, ClassResponse {
        id: 1,
        name: "Class #1".to_string(),
        start_date: "2019-06-01".to_string(),
        end_date: "2019-08-31".to_string(),
        capacity: 20,
    });

    let resp = client.get("/classes").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let classes = resp.into_json::<Vec<ClassResponse>>().unwrap();
    assert_eq!(classes, vec![class]);
}

#[test]
fn add_class_invalid() {
    let client = create_test_server();
    let resp = client.post("/classes")
        .header(ContentType::JSON)
        .body("{ not json")
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid request body for class");

    let resp = client.post("/classes")
        .json(&json!({"name": "Full", "start_date": "2019-06-01", "end_date": "2019-08-31", "capacity": 0}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid capacity in payload, must be over 0");

    let resp = client.post("/classes")
        .json(&json!({"name": "Short", "start_date": "2019-6-1", "end_date": "2019-08-31", "capacity": 1}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid start_date in payload");

    let resp = client.post("/classes")
        .json(&json!({"name": "Bad", "start_date": "2019-06-01", "end_date": "2019-13-45", "capacity": 1}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);

    let resp = client.post("/classes")
        .json(&json!({"name": "Negative", "start_date": "2019-06-01", "end_date": "2019-08-31", "capacity": -3}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid request body for class");

    let resp = client.get("/classes").dispatch();
    assert!(resp.into_json::<Vec<ClassResponse>>().unwrap().is_empty());
}

#[test]
fn put_class() {
    let client = create_test_server();
    let class = create_summer_class(&client);

    let resp = client.put(format!("/classes/{}", class.id))
        .json(&json!({
            "id": 123,
            "name": "New class name",
            "start_date": "2019-06-10T00:00:00Z",
            "end_date": "2019-08-22",
            "capacity": 15,
        }))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let updated = resp.into_json::<ClassResponse>().unwrap();
    assert_eq!(updated, ClassResponse {
        id: class.id,
        name: "New class name".to_string(),
        start_date: "2019-06-10".to_string(),
        end_date: "2019-08-22".to_string(),
        capacity: 15,
    });

    let resp = client.get(format!("/classes/{}", class.id)).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.into_json::<ClassResponse>().unwrap(), updated);

    // partial update keeps the stored dates
    let resp = client.put(format!("/classes/{}", class.id))
        .json(&json!({"capacity": 1}))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let partial = resp.into_json::<ClassResponse>().unwrap();
    assert_eq!(partial.capacity, 1);
    assert_eq!(partial.start_date, "2019-06-10");

    let resp = client.put(format!("/classes/{}", class.id))
        .json(&json!({"capacity": 0}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
}

#[test]
fn class_not_found() {
    let client = create_test_server();
    let resp = client.get("/classes/999").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(message(resp), "Class does not exist");

    let resp = client.put("/classes/234")
        .json(&json!({"name": "Shouldn't work", "capacity": 15}))
        .dispatch();
    assert_eq!(resp.status(), Status::NotFound);

    // a missing record is reported before a bad body
    let resp = client.put("/classes/234")
        .header(ContentType::JSON)
        .body("nope")
        .dispatch();
    assert_eq!(resp.status(), Status::NotFound);

    let resp = client.delete("/classes/345").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(message(resp), "Class does not exist");
}

#[test]
fn class_invalid_id() {
    let client = create_test_server();
    for uri in ["/classes/abc", "/classes/1.5"] {
        let resp = client.get(uri).dispatch();
        assert_eq!(resp.status(), Status::BadRequest);
        assert_eq!(message(resp), "Invalid class ID");
    }
    let resp = client.delete("/classes/x").dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
}

#[test]
fn delete_class() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    let resp = client.delete(format!("/classes/{}", class.id)).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(message(resp), "Class removed");

    let resp = client.get(format!("/classes/{}", class.id)).dispatch();
    assert_eq!(resp.status(), Status::NotFound);
}

#[test]
fn add_booking() {
    let client = create_test_server();
    let class = create_summer_class(&client);

    let resp = client.post("/bookings")
        .json(&json!({
            "id": 77,
            "name": "Tester",
            "booking_date": "2019-08-11",
            "class_id": class.id,
        }))
        .dispatch();
    assert_eq!(resp.status(), Status::Created);
    let booking = resp.into_json::<BookingResponse>().unwrap();
    assert_eq!(booking, BookingResponse {
        id: 1,
        name: "Tester".to_string(),
        booking_date: "2019-08-11".to_string(),
        class_id: class.id,
    });

    let resp = client.get("/bookings").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.into_json::<Vec<BookingResponse>>().unwrap(), vec![booking.clone()]);

    let resp = client.get(format!("/bookings/{}", booking.id)).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.into_json::<BookingResponse>().unwrap(), booking);
}

#[test]
fn booking_window() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    for (day, status) in [
        ("2019-05-31", Status::BadRequest),
        ("2019-06-01", Status::Created),
        ("2019-08-31", Status::Created),
        ("2019-09-01", Status::BadRequest),
        ("2019-09-15", Status::BadRequest),
    ] {
        let resp = client.post("/bookings")
            .json(&json!({"name": "Tester", "booking_date": day, "class_id": class.id}))
            .dispatch();
        assert_eq!(resp.status(), status, "booking on {day}");
        if status == Status::BadRequest {
            assert_eq!(message(resp), "Booked date outside class start and end");
        }
    }
}

#[test]
fn booking_without_class() {
    let client = create_test_server();
    let resp = client.post("/bookings")
        .json(&json!({"name": "Tester", "booking_date": "2019-08-11", "class_id": 5}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "No such class");

    let resp = client.post("/bookings")
        .json(&json!({"name": "Tester", "booking_date": "2019-08-11"}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "No such class");
}

#[test]
fn booking_invalid_body() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    let resp = client.post("/bookings")
        .header(ContentType::JSON)
        .body("[1, 2")
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid request body for booking");

    let resp = client.post("/bookings")
        .json(&json!({"name": "Tester", "booking_date": "2019-08", "class_id": class.id}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid booking_date in payload");
}

#[test]
fn put_booking() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    let resp = client.post("/bookings")
        .json(&json!({"name": "Tester", "booking_date": "2019-08-11", "class_id": class.id}))
        .dispatch();
    let booking = resp.into_json::<BookingResponse>().unwrap();

    let resp = client.put(format!("/bookings/{}", booking.id))
        .json(&json!({"id": 99, "name": "Other", "booking_date": "2019-07-01T10:00:00Z"}))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.into_json::<BookingResponse>().unwrap(), BookingResponse {
        id: booking.id,
        name: "Other".to_string(),
        booking_date: "2019-07-01".to_string(),
        class_id: class.id,
    });

    let resp = client.put(format!("/bookings/{}", booking.id))
        .json(&json!({"booking_date": "2019-09-15"}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Booked date outside class start and end");

    let resp = client.put(format!("/bookings/{}", booking.id))
        .json(&json!({"class_id": 999}))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "No such class");
}

#[test]
fn booking_not_found() {
    let client = create_test_server();
    let resp = client.get("/bookings/999").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(message(resp), "Booking does not exist");

    let resp = client.put("/bookings/999")
        .json(&json!({"name": "Tester"}))
        .dispatch();
    assert_eq!(resp.status(), Status::NotFound);

    let resp = client.delete("/bookings/999").dispatch();
    assert_eq!(resp.status(), Status::NotFound);

    let resp = client.get("/bookings/first").dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert_eq!(message(resp), "Invalid booking ID");
}

#[test]
fn delete_booking() {
    let client = create_test_server();
    let class = create_summer_class(&client);
    let resp = client.post("/bookings")
        .json(&json!({"name": "Tester", "booking_date": "2019-08-11", "class_id": class.id}))
        .dispatch();
    let booking = resp.into_json::<BookingResponse>().unwrap();

    let resp = client.delete(format!("/bookings/{}", booking.id)).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(message(resp), "Booking removed");
    let resp = client.get("/bookings").dispatch();
    assert!(resp.into_json::<Vec<BookingResponse>>().unwrap().is_empty());
}

#[test]
fn unknown_route_is_json() {
    let client = create_test_server();
    let resp = client.get("/instructors").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(message(resp), "Not Found");
}
