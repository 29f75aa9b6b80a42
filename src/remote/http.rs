//! Sentry HTTP implementation of [`IntegrationClient`]

use serde::Deserialize;
use std::time::Duration;
use ureq::Agent;

use super::{ConfigDocument, IntegrationClient, Page, RemoteIntegration, link};
use crate::config::ApiConfig;
use crate::error::RemoteError;

/// Integration as returned by `GET /organizations/{org}/integrations/`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIntegration {
    id: String,
    name: String,
    provider: WireProvider,
    #[serde(default)]
    config_data: Option<ConfigDocument>,
}

#[derive(Debug, Deserialize)]
struct WireProvider {
    key: String,
}

impl From<WireIntegration> for RemoteIntegration {
    fn from(wire: WireIntegration) -> Self {
        Self {
            id: wire.id,
            provider_key: wire.provider.key,
            name: wire.name,
            config_data: wire.config_data.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    detail: String,
}

pub struct HttpClient {
    agent: Agent,
    base_url: String,
    token: String,
    user_agent: String,
}

impl HttpClient {
    /// Build a client from typed API settings; fails without a token
    pub fn new(api: &ApiConfig) -> Result<Self, RemoteError> {
        let token = api
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(RemoteError::MissingToken)?;

        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(api.timeout_secs)))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: Agent::new_with_config(config),
            base_url: api.normalized_base_url(),
            token,
            user_agent: api.user_agent.clone(),
        })
    }

    /// Path segments are percent-encoded so `?`, `#` or `/` in a slug stay in the segment
    fn integrations_url(&self, organization: &str) -> String {
        format!(
            "{}0/organizations/{}/integrations/",
            self.base_url,
            urlencoding::encode(organization)
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Read the body, turning non-2xx statuses into [`RemoteError::Status`]
    fn read_body(response: &mut ureq::http::Response<ureq::Body>) -> Result<String, RemoteError> {
        let status = response.status();
        let body = response.body_mut().read_to_string()?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<WireErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl IntegrationClient for HttpClient {
    fn list(&self, organization: &str, provider_key: &str, cursor: Option<&str>) -> Result<Page, RemoteError> {
        let url = self.integrations_url(organization);
        log::debug!(
            "GET {} provider_key={} cursor={}",
            url,
            provider_key,
            cursor.unwrap_or("")
        );

        let mut request = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .header("User-Agent", &self.user_agent)
            .query("provider_key", provider_key);
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }

        let mut response = request.call()?;

        let next_cursor = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(link::next_cursor);

        let body = Self::read_body(&mut response)?;
        let wire: Vec<WireIntegration> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(Page {
            items: wire.into_iter().map(RemoteIntegration::from).collect(),
            next_cursor,
        })
    }

    fn update_config(
        &self,
        organization: &str,
        integration_id: &str,
        document: &ConfigDocument,
    ) -> Result<RemoteIntegration, RemoteError> {
        let url = format!(
            "{}{}/",
            self.integrations_url(organization),
            urlencoding::encode(integration_id)
        );
        log::debug!("POST {} ({} keys)", url, document.len());

        let request_body = serde_json::to_string(document).map_err(|e| RemoteError::Decode(e.to_string()))?;

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .send(request_body.as_bytes())?;

        let body = Self::read_body(&mut response)?;

        // The config endpoint usually answers with an empty body
        match serde_json::from_str::<WireIntegration>(&body) {
            Ok(wire) => Ok(wire.into()),
            Err(_) => Ok(RemoteIntegration {
                id: integration_id.to_string(),
                provider_key: String::new(),
                name: String::new(),
                config_data: document.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ConfigValue;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> HttpClient {
        let api = ApiConfig {
            base_url: format!("{}/api", server.url()),
            token: Some("test-token".to_string()),
            ..ApiConfig::default()
        };
        HttpClient::new(&api).expect("client builds")
    }

    #[test]
    fn test_new_requires_token() {
        let api = ApiConfig::default();
        assert!(matches!(HttpClient::new(&api), Err(RemoteError::MissingToken)));
    }

    #[test]
    fn test_list_parses_items_and_cursor() {
        let mut server = mockito::Server::new();
        let link = r#"<http://x/>; rel="previous"; results="false"; cursor="0:0:1", <http://x/>; rel="next"; results="true"; cursor="0:100:0""#;

        let mock = server
            .mock("GET", "/api/0/organizations/acme/integrations/")
            .match_query(Matcher::UrlEncoded("provider_key".into(), "slack".into()))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("link", link)
            .with_body(
                r##"[
                    {"id": "123", "name": "Acme", "provider": {"key": "slack", "name": "Slack"},
                     "configData": {"channel": "#alerts"}, "status": "active"},
                    {"id": "456", "name": "Other", "provider": {"key": "slack"}, "configData": null}
                ]"##,
            )
            .create();

        let client = client_for(&server);
        let page = client.list("acme", "slack", None).expect("list succeeds");

        mock.assert();
        assert_eq!(page.next_cursor.as_deref(), Some("0:100:0"));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "123");
        assert_eq!(page.items[0].provider_key, "slack");
        assert_eq!(
            page.items[0].config_data.get("channel"),
            Some(&ConfigValue::from("#alerts"))
        );
        assert!(page.items[1].config_data.is_empty());
    }

    #[test]
    fn test_list_sends_cursor() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/0/organizations/acme/integrations/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("provider_key".into(), "github".into()),
                Matcher::UrlEncoded("cursor".into(), "0:100:0".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create();

        let client = client_for(&server);
        let page = client.list("acme", "github", Some("0:100:0")).expect("list succeeds");

        mock.assert();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_list_maps_error_detail() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/0/organizations/acme/integrations/")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"detail": "You do not have permission to perform this action."}"#)
            .create();

        let client = client_for(&server);
        match client.list("acme", "slack", None) {
            Err(RemoteError::Status { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "You do not have permission to perform this action.");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_tolerates_non_string_config_values() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/0/organizations/acme/integrations/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[
                    {"id": "1", "name": "Other", "provider": {"key": "slack"}, "configData": {"enabled": true, "retries": 3}},
                    {"id": "2", "name": "Y", "provider": {"key": "slack"}, "configData": {"channel": "x"}}
                ]"#,
            )
            .create();

        let client = client_for(&server);
        let page = client.list("acme", "slack", None).expect("list succeeds");

        assert_eq!(page.items.len(), 2);
        assert_eq!(
            page.items[0].config_data.get("enabled"),
            Some(&ConfigValue::Other(serde_json::json!(true)))
        );
        let matched = crate::reconcile::match_by_name(page.items, "slack", "Y").expect("unique match");
        assert_eq!(matched.config_data.get("channel"), Some(&ConfigValue::from("x")));
    }

    #[test]
    fn test_list_rejects_bad_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/0/organizations/acme/integrations/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create();

        let client = client_for(&server);
        assert!(matches!(client.list("acme", "slack", None), Err(RemoteError::Decode(_))));
    }

    #[test]
    fn test_update_config_posts_document() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/0/organizations/acme/integrations/123/")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"channel": "#ops"})))
            .with_status(200)
            .with_body("")
            .create();

        let client = client_for(&server);
        let mut document = ConfigDocument::new();
        document.insert("channel".to_string(), ConfigValue::from("#ops"));

        let result = client.update_config("acme", "123", &document).expect("update succeeds");

        mock.assert();
        assert_eq!(result.id, "123");
        assert_eq!(result.config_data, document);
    }

    #[test]
    fn test_path_segments_are_percent_encoded() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/0/organizations/ac%3Fme/integrations/12%233/")
            .with_status(200)
            .create();

        let client = client_for(&server);
        client
            .update_config("ac?me", "12#3", &ConfigDocument::new())
            .expect("update succeeds");

        mock.assert();
    }

    #[test]
    fn test_update_config_surfaces_status() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/0/organizations/acme/integrations/999/")
            .with_status(404)
            .with_body(r#"{"detail": "The requested resource does not exist"}"#)
            .create();

        let client = client_for(&server);
        let result = client.update_config("acme", "999", &ConfigDocument::new());
        assert!(matches!(result, Err(RemoteError::Status { status: 404, .. })));
    }
}
