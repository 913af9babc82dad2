use serde_json::{json, Value};
use tea_admin::{AdminConfig, ApiClient};
use wiremock::MockServer;

/// Mock backend plus a client pointed at it.
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Starts the mock server and lets the caller adjust the configuration.
    pub async fn start_with(adjust: impl FnOnce(&mut AdminConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = AdminConfig::new(server.uri(), "test".to_string());
        config.request_timeout_secs = 5;
        adjust(&mut config);
        let client = ApiClient::new(config).expect("client should build");
        Self { server, client }
    }

    /// Number of requests the mock server has seen so far.
    #[allow(dead_code)]
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

#[allow(dead_code)]
pub fn employee_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "employeeId": format!("E{}", id),
        "role": "Supervisor",
        "contact": "0771234567"
    })
}
