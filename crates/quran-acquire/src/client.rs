use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::AcquireConfig;
use crate::error::{AcquireError, Result};

/// Thin JSON-over-HTTP client for the Quran API.
///
/// Every call is a single GET with no retries and no timeout beyond
/// reqwest's defaults (none); redirects follow reqwest's default policy.
/// The HTTP status is not inspected: a JSON error body parses like any
/// other response and simply lacks the fields callers look for.
/// Logging is left to callers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|source| AcquireError::Network {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AcquireConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path plus query parameters.
    pub fn url<K, V>(&self, path: &str, params: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        let mut url = reqwest::Url::parse(&joined).map_err(|e| AcquireError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key.as_ref(), value.as_ref());
            }
        }
        Ok(url.into())
    }

    /// GET an absolute URL and parse the full body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let network = |source| AcquireError::Network {
            url: url.to_string(),
            source,
        };
        let response = self.http.get(url).send().await.map_err(network)?;
        let body = response.text().await.map_err(network)?;
        serde_json::from_str(&body).map_err(|source| AcquireError::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// GET an API path with query parameters.
    pub async fn get<K, V>(&self, path: &str, params: &[(K, V)]) -> Result<Value>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.url(path, params)?;
        self.get_json(&url).await
    }

    /// GET an API path and pull the array stored under `field`.
    ///
    /// A missing or null field yields an empty list; elements that do not
    /// deserialize into `T` are a [`AcquireError::Parse`].
    pub async fn get_array<T, K, V>(
        &self,
        path: &str,
        params: &[(K, V)],
        field: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.url(path, params)?;
        let body = self.get_json(&url).await?;
        unwrap_array(body, field).map_err(|source| AcquireError::Parse { url, source })
    }
}

/// Take `body[field]` as a list, treating absence as empty.
pub fn unwrap_array<T: DeserializeOwned>(
    mut body: Value,
    field: &str,
) -> serde_json::Result<Vec<T>> {
    match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, "quran-acquire-test").unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client("https://api.quran.com/api/v4/");
        let no_params: &[(&str, &str)] = &[];
        assert_eq!(
            client.url("/chapters", no_params).unwrap(),
            "https://api.quran.com/api/v4/chapters"
        );
        assert_eq!(
            client
                .url("quran/verses/uthmani", &[("chapter_number", "2")])
                .unwrap(),
            "https://api.quran.com/api/v4/quran/verses/uthmani?chapter_number=2"
        );
        assert_eq!(
            client.url("/verses/by_chapter/1", &[("translations", "20,33")]).unwrap(),
            "https://api.quran.com/api/v4/verses/by_chapter/1?translations=20%2C33"
        );
    }

    #[tokio::test]
    async fn test_get_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chapters"))
            .and(query_param("language", "en"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"chapters": [{"id": 1}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server.uri())
            .get("/chapters", &[("language", "en")])
            .await
            .unwrap();
        assert_eq!(body["chapters"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let no_params: &[(&str, &str)] = &[];
        let err = client(&server.uri()).get("/chapters", no_params).await.unwrap_err();
        match err {
            AcquireError::Parse { url, .. } => assert!(url.ends_with("/chapters")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_json_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"status": 404, "error": "Not Found"})),
            )
            .mount(&server)
            .await;

        let no_params: &[(&str, &str)] = &[];
        let items: Vec<Item> = client(&server.uri())
            .get_array("/quran/verses/uthmani", no_params, "verses")
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop a listener to get a port nobody is serving.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}");
        let no_params: &[(&str, &str)] = &[];
        let err = client(&url).get("/chapters", no_params).await.unwrap_err();
        match err {
            AcquireError::Network { url: failed, .. } => {
                assert!(failed.contains(&port.to_string()))
            }
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_array() {
        let body = json!({"verses": [{"id": 1}, {"id": 2}]});
        let items: Vec<Item> = unwrap_array(body, "verses").unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);

        let missing: Vec<Item> = unwrap_array(json!({"other": []}), "verses").unwrap();
        assert!(missing.is_empty());

        let null: Vec<Item> = unwrap_array(json!({"verses": null}), "verses").unwrap();
        assert!(null.is_empty());

        assert!(unwrap_array::<Item>(json!({"verses": "nope"}), "verses").is_err());
    }
}
