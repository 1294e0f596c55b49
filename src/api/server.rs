//
//  sonarqube-client
//  api/server.rs
//

//! Server version (`api/server`).

use super::client::SonarClient;
use super::common::{ApiError, NO_PARAMS};

/// Service for `api/server`.
pub struct ServerService<'a> {
    client: &'a SonarClient,
}

impl<'a> ServerService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns the server version as plain text, e.g. `"9.9.1.69595"`.
    ///
    /// This endpoint is unauthenticated and is the conventional liveness
    /// probe for a SonarQube instance.
    pub async fn version(&self) -> Result<String, ApiError> {
        self.client.get_text("server/version", NO_PARAMS).await
    }
}

#[cfg(test)]
mod tests {
    use crate::SonarClient;

    #[tokio::test]
    async fn test_version_returns_plain_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/server/version")
            .with_body("9.9.1.69595")
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let version = client.server().version().await.unwrap();
        assert_eq!(version, "9.9.1.69595");
        mock.assert_async().await;
    }
}
