//! reqwest client for the upstream REST backend.
//!
//! No timeouts and no retries: a call either answers or fails once.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use papeleria_accounting::{CurrencyCode, ExchangeRate, NewRatePayload};
use papeleria_auth::{LoginForm, NewUserPayload, RegisterForm, SessionGrant, StaffAccount};
use papeleria_core::{ClientId, CurrencyId, Money, ProductId, SaleId, UserId};
use papeleria_parties::{Client, NewClientPayload};
use papeleria_products::{Category, Product, ProductPayload};
use papeleria_sales::{PaymentMethod, Sale, SaleRequest};

use super::envelope::{Envelope, Single, upstream_message};
use super::wire::{
    CategoryDto, ClientDto, ExchangeRateDto, LoginResponseDto, PaymentDto, PaymentMethodDto, ProductDto,
    SaleDto, UserDto,
};

pub const CONNECTION_FAILED: &str = "Error de conexión con el servidor";

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status. `message` is its own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The bearer token was refused.
    #[error("upstream session expired")]
    Unauthorized,

    #[error("Error de conexión con el servidor")]
    Network(#[source] reqwest::Error),

    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

/// Unauthenticated handle on the backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl BackendClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// Attach a bearer token to every call made through the returned handle.
    pub fn authorized<'a>(&'a self, token: &'a str) -> AuthorizedClient<'a> {
        AuthorizedClient { backend: self, token }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response, BackendError> {
        tracing::debug!(%method, path, "upstream request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "upstream unreachable");
            BackendError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = upstream_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        tracing::warn!(%method, path, status = status.as_u16(), %message, "upstream rejected request");
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let bytes = response.bytes().await.map_err(BackendError::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// `POST /auth/login`. Any rejection (including 401) is `Rejected`.
    pub async fn login(&self, form: &LoginForm) -> Result<SessionGrant, BackendError> {
        let path = "/auth/login";
        let builder = self.request(Method::POST, path).json(form);
        let response = self.send(Method::POST, path, builder).await?;
        let dto: Single<LoginResponseDto> = Self::decode(response).await?;
        Ok(dto.into_inner().into_grant(form.cedula.trim()))
    }

    /// `POST /auth/register`.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), BackendError> {
        let path = "/auth/register";
        let builder = self.request(Method::POST, path).json(form);
        self.send(Method::POST, path, builder).await?;
        Ok(())
    }
}

/// Backend handle carrying the signed-in user's access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedClient<'a> {
    backend: &'a BackendClient,
    token: &'a str,
}

impl AuthorizedClient<'_> {
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, BackendError> {
        let mut builder = self.backend.request(method.clone(), path).bearer_auth(self.token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        match self.backend.send(method, path, builder).await {
            Err(BackendError::Rejected { status, .. }) if status == StatusCode::UNAUTHORIZED.as_u16() => {
                Err(BackendError::Unauthorized)
            }
            other => other,
        }
    }

    async fn list<D: DeserializeOwned>(&self, path: &str) -> Result<Vec<D>, BackendError> {
        let response = self.execute::<()>(Method::GET, path, None).await?;
        let envelope: Envelope<D> = BackendClient::decode(response).await?;
        Ok(envelope.into_vec())
    }

    async fn one<D: DeserializeOwned>(&self, path: &str) -> Result<D, BackendError> {
        let response = self.execute::<()>(Method::GET, path, None).await?;
        let single: Single<D> = BackendClient::decode(response).await?;
        Ok(single.into_inner())
    }

    /// Mutations: the response body is not needed, views re-fetch afterwards.
    async fn write<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), BackendError> {
        self.execute(method, path, body).await.map(drop)
    }

    pub async fn products(&self) -> Result<Vec<Product>, BackendError> {
        let rows: Vec<ProductDto> = self.list("/products").await?;
        Ok(rows.into_iter().map(ProductDto::into_domain).collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let rows: Vec<CategoryDto> = self.list("/categorys").await?;
        Ok(rows.into_iter().map(CategoryDto::into_domain).collect())
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> Result<(), BackendError> {
        self.write(Method::POST, "/products", Some(payload)).await
    }

    pub async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<(), BackendError> {
        self.write(Method::PATCH, &format!("/products/{id}"), Some(payload)).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.write::<()>(Method::DELETE, &format!("/products/{id}"), None).await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, BackendError> {
        let rows: Vec<ClientDto> = self.list("/clients").await?;
        Ok(rows.into_iter().map(ClientDto::into_domain).collect())
    }

    pub async fn create_client(&self, payload: &NewClientPayload) -> Result<(), BackendError> {
        self.write(Method::POST, "/clients", Some(payload)).await
    }

    /// `PATCH /clients/{id}/payment {abono}`.
    pub async fn apply_payment(&self, client: ClientId, amount: Money) -> Result<(), BackendError> {
        let body = PaymentDto { abono: amount };
        self.write(Method::PATCH, &format!("/clients/{client}/payment"), Some(&body)).await
    }

    pub async fn sales(&self) -> Result<Vec<Sale>, BackendError> {
        let rows: Vec<SaleDto> = self.list("/sales").await?;
        Ok(rows.into_iter().map(SaleDto::into_domain).collect())
    }

    pub async fn sale(&self, id: SaleId) -> Result<Sale, BackendError> {
        let dto: SaleDto = self.one(&format!("/sales/{id}")).await?;
        Ok(dto.into_domain())
    }

    pub async fn create_sale(&self, request: &SaleRequest) -> Result<(), BackendError> {
        self.write(Method::POST, "/sales", Some(request)).await
    }

    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, BackendError> {
        let rows: Vec<PaymentMethodDto> = self.list("/sales/paymentMethod").await?;
        Ok(rows.into_iter().filter_map(PaymentMethodDto::into_domain).collect())
    }

    pub async fn users(&self) -> Result<Vec<StaffAccount>, BackendError> {
        let rows: Vec<UserDto> = self.list("/users").await?;
        Ok(rows.into_iter().map(UserDto::into_domain).collect())
    }

    pub async fn create_user(&self, payload: &NewUserPayload) -> Result<(), BackendError> {
        self.write(Method::POST, "/users", Some(payload)).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        self.write::<()>(Method::DELETE, &format!("/users/{id}"), None).await
    }

    /// Latest rate for `code`; `None` when the backend has none recorded.
    pub async fn latest_rate(&self, code: CurrencyCode) -> Result<Option<ExchangeRate>, BackendError> {
        let path = format!("/exchange-rates/latest/{code}");
        let response = match self.execute::<()>(Method::GET, &path, None).await {
            Err(BackendError::Rejected { status: 404, .. }) => return Ok(None),
            other => other?,
        };
        let body: Value = BackendClient::decode(response).await?;
        let data = match body {
            Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        if data.is_null() {
            return Ok(None);
        }
        let dto: ExchangeRateDto = serde_json::from_value(data).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Some(dto.into_domain()))
    }

    /// Rate history, newest first as returned by the backend.
    pub async fn rate_history(&self, currency: CurrencyId) -> Result<Vec<ExchangeRate>, BackendError> {
        let rows: Vec<ExchangeRateDto> = self.list(&format!("/exchange-rates/history/{currency}")).await?;
        Ok(rows.into_iter().map(ExchangeRateDto::into_domain).collect())
    }

    pub async fn create_rate(&self, payload: &NewRatePayload) -> Result<(), BackendError> {
        self.write(Method::POST, "/exchange-rates", Some(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let backend = BackendClient::new("http://localhost:4000/api/");
        assert_eq!(&*backend.base_url, "http://localhost:4000/api");
    }

    #[test]
    fn rejection_displays_backend_message_verbatim() {
        let rejected = BackendError::Rejected {
            status: 409,
            message: "La cédula ya existe".to_string(),
        };
        assert_eq!(rejected.to_string(), "La cédula ya existe");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Nothing listens on the discard port.
        let backend = BackendClient::new("http://127.0.0.1:9/api");
        let form = LoginForm {
            cedula: "12345678".to_string(),
            password: "secreto123".to_string(),
        };

        let err = backend.login(&form).await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
        assert_eq!(err.to_string(), CONNECTION_FAILED);
    }
}
