use reqwest::{Client, Method, RequestBuilder, StatusCode};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::{ClientConfig, ClientError, ClientResult};
use crate::{
    db::entities::types::PackagingStatus,
    error::FieldError,
    response::Pagination,
    services::{
        packaging_service::PackagingInput,
        product_service::ProductInput,
        views::{AuthPayload, PackagingView, ProductView, UserView},
    },
};

/// Wire form of every API response.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    message: Option<String>,
    data: Option<T>,
    pagination: Option<Pagination>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: UserView,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Parameters of `GET /packaging`. `None` fields are left out of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingQuery {
    pub status: Option<PackagingStatus>,
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl Default for PackagingQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            page: 1,
            limit: 10,
        }
    }
}

impl PackagingQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(status) = self.status {
            pairs.push(("status", status.to_value()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

#[async_trait::async_trait]
pub trait PackagingApi: Send + Sync {
    async fn list_packaging(&self, query: &PackagingQuery) -> ClientResult<ListPage<PackagingView>>;
    async fn get_packaging(&self, id: Uuid) -> ClientResult<PackagingView>;
    async fn create_packaging(&self, payload: &PackagingInput) -> ClientResult<PackagingView>;
    async fn update_packaging(
        &self,
        id: Uuid,
        payload: &PackagingInput,
    ) -> ClientResult<PackagingView>;
    async fn delete_packaging(&self, id: Uuid) -> ClientResult<()>;
}

#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthPayload>;
    async fn me(&self, token: &str) -> ClientResult<UserView>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// A copy of this client that sends `token` as a bearer credential.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ClientResult<AuthPayload> {
        let body = serde_json::json!({ "email": email, "password": password, "name": name });
        let request = self.request(Method::POST, "/auth/register").json(&body);
        data(send(request).await?)
    }

    pub async fn list_products(
        &self,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> ClientResult<ListPage<ProductView>> {
        let mut pairs = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search {
            pairs.push(("search", search.to_string()));
        }
        let request = self.authorized(Method::GET, "/products")?.query(&pairs);
        page_of(send(request).await?)
    }

    pub async fn create_product(&self, payload: &ProductInput) -> ClientResult<ProductView> {
        let request = self.authorized(Method::POST, "/products")?.json(payload);
        data(send(request).await?)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }
}

#[async_trait::async_trait]
impl PackagingApi for ApiClient {
    async fn list_packaging(&self, query: &PackagingQuery) -> ClientResult<ListPage<PackagingView>> {
        let request = self
            .authorized(Method::GET, "/packaging")?
            .query(&query.to_pairs());
        page_of(send(request).await?)
    }

    async fn get_packaging(&self, id: Uuid) -> ClientResult<PackagingView> {
        let request = self.authorized(Method::GET, &format!("/packaging/{id}"))?;
        data(send(request).await?)
    }

    async fn create_packaging(&self, payload: &PackagingInput) -> ClientResult<PackagingView> {
        let request = self.authorized(Method::POST, "/packaging")?.json(payload);
        data(send(request).await?)
    }

    async fn update_packaging(
        &self,
        id: Uuid,
        payload: &PackagingInput,
    ) -> ClientResult<PackagingView> {
        let request = self
            .authorized(Method::PUT, &format!("/packaging/{id}"))?
            .json(payload);
        data(send(request).await?)
    }

    async fn delete_packaging(&self, id: Uuid) -> ClientResult<()> {
        let request = self.authorized(Method::DELETE, &format!("/packaging/{id}"))?;
        send::<serde_json::Value>(request).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthPayload> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&Credentials { email, password });
        data(send(request).await?)
    }

    async fn me(&self, token: &str) -> ClientResult<UserView> {
        let request = self.request(Method::GET, "/auth/me").bearer_auth(token);
        data::<MeResponse>(send(request).await?).map(|me| me.user)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<ApiEnvelope<T>> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()));
    }
    Err(api_error(status, &bytes))
}

fn api_error(status: StatusCode, bytes: &[u8]) -> ClientError {
    let envelope = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(bytes).ok();
    let (message, errors) = match envelope {
        Some(envelope) => (envelope.message, envelope.errors),
        None => (None, Vec::new()),
    };
    ClientError::Api {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        }),
        errors,
    }
}

fn data<T>(envelope: ApiEnvelope<T>) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("response carried no data".to_string()))
}

fn page_of<T>(envelope: ApiEnvelope<Vec<T>>) -> ClientResult<ListPage<T>> {
    let pagination = envelope
        .pagination
        .ok_or_else(|| ClientError::Decode("list response carried no pagination".to_string()))?;
    Ok(ListPage {
        data: envelope.data.unwrap_or_default(),
        pagination,
    })
}
