//! Async HTTP client for the PoetryDB REST API.

use std::time::Duration;

use poetry_core::{model::PoemRecord, outcome::Outcome, record::parse_poem_payload};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{error::ClientError, settings::ApiConfig};

#[derive(Deserialize)]
struct AuthorList {
  authors: Vec<String>,
}

#[derive(Deserialize)]
struct TitleList {
  titles: Vec<String>,
}

/// Read-only client for `/author`, `/title` and `/title/{title}`.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct PoetryDbClient {
  client:   Client,
  base_url: String,
}

impl PoetryDbClient {
  pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
    })
  }

  /// GET `path` and decode the body. Anything but `200 OK` is an error.
  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
    let http_err = |source| ClientError::Http { path: path.to_string(), source };

    let resp = self
      .client
      .get(format!("{}{path}", self.base_url))
      .send()
      .await
      .map_err(http_err)?;

    if resp.status() != StatusCode::OK {
      return Err(ClientError::Status { path: path.to_string(), status: resp.status() });
    }
    resp.json().await.map_err(http_err)
  }

  /// `GET /author`
  pub async fn fetch_authors(&self) -> Result<Vec<String>, ClientError> {
    Ok(self.get_json::<AuthorList>("/author").await?.authors)
  }

  /// `GET /title`
  pub async fn fetch_titles(&self) -> Result<Vec<String>, ClientError> {
    Ok(self.get_json::<TitleList>("/title").await?.titles)
  }

  /// `GET /title/{title}`
  ///
  /// A payload that is not exactly one poem with `author`, `title` and
  /// `linecount` is skipped rather than treated as an error.
  pub async fn fetch_poem(&self, title: &str) -> Result<Outcome<PoemRecord>, ClientError> {
    let path = format!("/title/{}", urlencoding::encode(title));
    let payload: serde_json::Value = self.get_json(&path).await?;
    Ok(parse_poem_payload(payload))
  }
}

#[cfg(test)]
mod tests {
  use poetry_core::outcome::Skip;
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  async fn setup() -> (MockServer, PoetryDbClient) {
    let server = MockServer::start().await;
    let client = PoetryDbClient::new(&ApiConfig {
      base_url:     server.uri(),
      timeout_secs: 5,
    })
    .unwrap();
    (server, client)
  }

  #[tokio::test]
  async fn fetch_authors_returns_names() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/author"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "authors": ["Emily Dickinson", "John Keats"] })),
      )
      .mount(&server)
      .await;

    let authors = client.fetch_authors().await.unwrap();
    assert_eq!(authors, ["Emily Dickinson", "John Keats"]);
  }

  #[tokio::test]
  async fn fetch_authors_non_200_is_an_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/author"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let err = client.fetch_authors().await.unwrap_err();
    assert!(matches!(
      err,
      ClientError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
    ));
  }

  #[tokio::test]
  async fn fetch_titles_returns_titles() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "titles": ["Ozymandias"] })))
      .mount(&server)
      .await;

    assert_eq!(client.fetch_titles().await.unwrap(), ["Ozymandias"]);
  }

  #[tokio::test]
  async fn fetch_titles_malformed_body_is_an_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "names": [] })))
      .mount(&server)
      .await;

    assert!(matches!(
      client.fetch_titles().await,
      Err(ClientError::Http { .. })
    ));
  }

  #[tokio::test]
  async fn fetch_poem_escapes_the_title() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title/The%20Raven"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
        "title": "The Raven",
        "author": "Edgar Allan Poe",
        "lines": ["Once upon a midnight dreary, while I pondered, weak and weary,"],
        "linecount": "108"
      }])))
      .mount(&server)
      .await;

    let record = client.fetch_poem("The Raven").await.unwrap().done().unwrap();
    assert_eq!(record.author, "Edgar Allan Poe");
    assert_eq!(record.line_count, 108);
  }

  #[tokio::test]
  async fn fetch_poem_missing_linecount_is_skipped() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title/Fragment"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
        "title": "Fragment",
        "author": "Anon",
        "lines": ["..."]
      }])))
      .mount(&server)
      .await;

    assert_eq!(
      client.fetch_poem("Fragment").await.unwrap(),
      Outcome::Skipped(Skip::MissingField("linecount"))
    );
  }

  #[tokio::test]
  async fn fetch_poem_not_found_body_is_skipped() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title/Nothing"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!({ "status": 404, "reason": "Not found" })),
      )
      .mount(&server)
      .await;

    assert!(!client.fetch_poem("Nothing").await.unwrap().is_done());
  }

  #[tokio::test]
  async fn fetch_poem_server_error_is_an_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
      .and(path("/title/Broken"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    assert!(matches!(
      client.fetch_poem("Broken").await,
      Err(ClientError::Status { .. })
    ));
  }
}
