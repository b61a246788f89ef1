use std::convert::Infallible;
use std::fmt::Display;

use rocket::figment::{providers::Env, Figment};
use rocket::http::ContentType;
use rocket::request::{FromRequest, Outcome};
use rocket::response::{self, Responder};
use rocket::Request;

/// Representation of a successful result, chosen from the `Accept` header
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultFormat {
    Xml,
    Plain,
}

impl ResultFormat {
    pub fn from_accept(accept: Option<&str>) -> ResultFormat {
        match accept {
            Some(a) if a.contains("application/xml") || a.contains("text/xml") => Self::Xml,
            _ => Self::Plain,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ResultFormat {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(Self::from_accept(request.headers().get_one("Accept")))
    }
}

/// A scalar result rendered as `<result>VALUE</result>` or bare text
#[derive(Debug)]
pub struct Formatted<T> {
    pub format: ResultFormat,
    pub value: T,
}

impl<T: Display> Formatted<T> {
    pub fn new(format: ResultFormat, value: T) -> Formatted<T> {
        Formatted { format, value }
    }

    pub fn body(&self) -> String {
        match self.format {
            ResultFormat::Xml => format!("<result>{}</result>", self.value),
            ResultFormat::Plain => self.value.to_string(),
        }
    }
}

impl<'r, T: Display> Responder<'r, 'static> for Formatted<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let content_type = match self.format {
            ResultFormat::Xml => ContentType::XML,
            ResultFormat::Plain => ContentType::Plain,
        };
        (content_type, self.body()).respond_to(req)
    }
}

pub fn figment() -> Figment {
    rocket::Config::figment()
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
