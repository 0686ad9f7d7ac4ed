use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::ContentType;
use rocket::{Data, Request, Response};

pub struct RequestLogger;
#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        debug!("{}: {}", req.method(), req.uri());
    }
}

/// Every response of the API is JSON, catchers included.
pub struct JsonContentType;
#[rocket::async_trait]
impl Fairing for JsonContentType {
    fn info(&self) -> Info {
        Info {
            name: "JSON content type",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(ContentType::JSON);
    }
}
