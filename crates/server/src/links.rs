//! URLs of the named routes, used for `Location` and pagination links.

use axum::http::{HeaderMap, header};
use uuid::Uuid;

pub(crate) const USERS_PATH: &str = "/api/users";

/// Builds absolute links to the users routes.
///
/// The base URL comes from configuration when set, otherwise from the
/// request `Host` header. Without either the links are path only.
#[derive(Clone, Debug, Default)]
pub struct LinkGenerator {
    public_url: Option<String>,
}

impl LinkGenerator {
    pub fn new(public_url: Option<String>) -> Self {
        let public_url = public_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Self { public_url }
    }

    fn base(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.public_url {
            return url.clone();
        }

        headers
            .get(header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(|host| format!("http://{host}"))
            .unwrap_or_default()
    }

    /// Link to `GET /api/users/{id}`.
    pub fn user(&self, headers: &HeaderMap, id: Uuid) -> String {
        format!("{}{USERS_PATH}/{id}", self.base(headers))
    }

    /// Link to one page of `GET /api/users`.
    pub fn users_page(&self, headers: &HeaderMap, page_number: usize, page_size: usize) -> String {
        format!(
            "{}{USERS_PATH}?pageNumber={page_number}&pageSize={page_size}",
            self.base(headers)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn host(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn links_use_host_header() {
        let links = LinkGenerator::default();
        let id = Uuid::nil();
        assert_eq!(
            links.user(&host("localhost:5000"), id),
            format!("http://localhost:5000/api/users/{id}")
        );
        assert_eq!(
            links.users_page(&host("localhost:5000"), 2, 10),
            "http://localhost:5000/api/users?pageNumber=2&pageSize=10"
        );
    }

    #[test]
    fn public_url_wins_over_host() {
        let links = LinkGenerator::new(Some("https://users.example.org/".to_string()));
        assert_eq!(
            links.users_page(&host("localhost:5000"), 1, 5),
            "https://users.example.org/api/users?pageNumber=1&pageSize=5"
        );
    }

    #[test]
    fn links_without_base_are_paths() {
        let links = LinkGenerator::new(Some(String::new()));
        assert_eq!(
            links.users_page(&HeaderMap::new(), 3, 20),
            "/api/users?pageNumber=3&pageSize=20"
        );
    }
}
