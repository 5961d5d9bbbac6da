use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Subscription, SubscriptionFilter, SubscriptionId},
    protocol::{AuthResponse, Credentials, MonthlyCost, NewSubscription},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod session;

pub use error::ClientError;
pub use session::{Session, SessionStore};

/// Backend operations used by the dashboard. Every call is a single
/// request/response round trip: no retries, no timeouts beyond the
/// transport's own.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;
    async fn list_subscriptions(
        &self,
        token: &str,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, ClientError>;
    async fn add_subscription(
        &self,
        token: &str,
        subscription: &NewSubscription,
    ) -> Result<Subscription, ClientError>;
    async fn cancel_subscription(
        &self,
        token: &str,
        subscription_id: &SubscriptionId,
    ) -> Result<(), ClientError>;
    async fn monthly_cost(&self, token: &str) -> Result<MonthlyCost, ClientError>;
}

pub struct HttpSubscriptionApi {
    http: Client,
    base_url: String,
}

impl HttpSubscriptionApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn authenticate(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<AuthResponse, ClientError> {
        let res = send(self.http.post(self.endpoint(path)).json(credentials)).await?;
        decode(res).await
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        self.authenticate("/auth/register", credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        self.authenticate("/auth/login", credentials).await
    }

    async fn list_subscriptions(
        &self,
        token: &str,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, ClientError> {
        let path = match filter {
            SubscriptionFilter::All => "/subscriptions",
            SubscriptionFilter::Active => "/subscriptions/active",
        };
        let res = send(self.http.get(self.endpoint(path)).bearer_auth(token)).await?;
        decode(res).await
    }

    async fn add_subscription(
        &self,
        token: &str,
        subscription: &NewSubscription,
    ) -> Result<Subscription, ClientError> {
        let res = send(
            self.http
                .post(self.endpoint("/subscriptions"))
                .bearer_auth(token)
                .json(subscription),
        )
        .await?;
        decode(res).await
    }

    async fn cancel_subscription(
        &self,
        token: &str,
        subscription_id: &SubscriptionId,
    ) -> Result<(), ClientError> {
        send(
            self.http
                .delete(self.endpoint(&format!("/subscriptions/{}", subscription_id.0)))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn monthly_cost(&self, token: &str) -> Result<MonthlyCost, ClientError> {
        let res = send(
            self.http
                .get(self.endpoint("/subscriptions/cost/monthly"))
                .bearer_auth(token),
        )
        .await?;
        decode(res).await
    }
}

/// Sends the request and turns any non-2xx response into
/// [`ClientError::Status`], carrying the body text when it is not blank.
async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let res = request.send().await?;
    let status = res.status();
    if status.is_success() {
        debug!(status = status.as_u16(), url = %res.url(), "api: request succeeded");
        return Ok(res);
    }

    let url = res.url().to_string();
    let message = res
        .text()
        .await
        .ok()
        .map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty());
    warn!(status = status.as_u16(), %url, "api: request rejected");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let body = res.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
