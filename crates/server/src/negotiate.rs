//! Content negotiation for single resource reads.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::ServerError;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Representation {
    Json,
    Xml,
}

impl Representation {
    /// Pick the representation from the `Accept` header: highest quality
    /// first, earlier entries win ties, JSON when nothing supported is
    /// listed.
    pub(crate) fn from_accept(headers: &HeaderMap) -> Self {
        let mut best: Option<(Self, f32)> = None;

        let ranges = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','));

        for range in ranges {
            let mut parts = range.split(';');
            let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
            let quality = parts
                .filter_map(|param| param.split_once('='))
                .filter(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                .find_map(|(_, q)| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality <= 0.0 {
                continue;
            }

            let representation = match media.as_str() {
                "application/json" | "application/*" | "*/*" => Self::Json,
                "application/xml" | "text/xml" => Self::Xml,
                _ => continue,
            };

            if best.is_none_or(|(_, best_quality)| quality > best_quality) {
                best = Some((representation, quality));
            }
        }

        best.map(|(representation, _)| representation)
            .unwrap_or(Self::Json)
    }

    pub(crate) fn render<T: Serialize>(self, value: &T) -> Result<Response, ServerError> {
        match self {
            Self::Json => Ok(Json(value).into_response()),
            Self::Xml => {
                let body = quick_xml::se::to_string(value)
                    .map_err(|err| ServerError::Internal(format!("xml serialization: {err}")))?;
                Ok((
                    [(header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
                    body,
                )
                    .into_response())
            }
        }
    }
}

/// Content type a HEAD response announces: the request's `Accept` value
/// with a charset.
pub(crate) fn echo_accept(headers: &HeaderMap) -> HeaderValue {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("application/json");

    HeaderValue::from_str(&format!("{accept}; charset=utf-8"))
        .unwrap_or_else(|_| HeaderValue::from_static("application/json; charset=utf-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::user::UserDto;
    use uuid::Uuid;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn defaults_to_json() {
        assert_eq!(Representation::from_accept(&HeaderMap::new()), Representation::Json);
        assert_eq!(Representation::from_accept(&accept("text/html")), Representation::Json);
    }

    #[test]
    fn picks_xml() {
        assert_eq!(
            Representation::from_accept(&accept("application/xml")),
            Representation::Xml
        );
        assert_eq!(
            Representation::from_accept(&accept("text/html, text/xml")),
            Representation::Xml
        );
    }

    #[test]
    fn quality_and_order() {
        assert_eq!(
            Representation::from_accept(&accept("application/json;q=0.5, application/xml")),
            Representation::Xml
        );
        assert_eq!(
            Representation::from_accept(&accept("application/xml, application/json")),
            Representation::Xml
        );
        assert_eq!(
            Representation::from_accept(&accept("application/xml;q=0, */*")),
            Representation::Json
        );
    }

    #[test]
    fn quality_parameter_ignores_case() {
        assert_eq!(
            Representation::from_accept(&accept("application/json;Q=0.5, application/xml")),
            Representation::Xml
        );
        assert_eq!(
            Representation::from_accept(&accept("application/xml; Q = 0, application/json")),
            Representation::Json
        );
    }

    #[test]
    fn renders_xml_document() {
        let dto = UserDto {
            id: Uuid::nil(),
            login: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };

        let response = Representation::Xml.render(&dto).unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            XML_CONTENT_TYPE
        );
    }

    #[test]
    fn head_echoes_accept() {
        assert_eq!(
            echo_accept(&accept("application/xml")),
            "application/xml; charset=utf-8"
        );
        assert_eq!(echo_accept(&HeaderMap::new()), "application/json; charset=utf-8");
    }
}
