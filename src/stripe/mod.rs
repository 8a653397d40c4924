//! Thin client for the payment gateway's REST API plus webhook signature
//! verification. Only the handful of calls this storefront needs: hosted
//! checkout sessions, line-item expansion and customer records.

pub mod types;
pub mod webhook;

use serde::Deserialize;
use thiserror::Error;

pub use types::{
    CheckoutSession, CheckoutSessionParams, Customer, Event, LineItem, SessionLineItem,
    StripeProduct,
};

const API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid webhook signature: {0}")]
    Signature(String),

    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .http
            .post(format!("{}/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params.to_form())
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Re-fetch the full line-item list for a session, with nested product
    /// metadata expanded. The webhook payload alone may be truncated.
    pub async fn list_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<LineItem>, StripeError> {
        let response = self
            .http
            .get(format!(
                "{}/checkout/sessions/{session_id}/line_items",
                self.api_base
            ))
            .bearer_auth(&self.secret_key)
            .query(&[("limit", "100"), ("expand[]", "data.price.product")])
            .send()
            .await?;
        let list: types::ListLineItems = Self::parse_response(response).await?;
        Ok(list.data)
    }

    pub async fn create_customer(
        &self,
        email: &str,
        name: Option<&str>,
        address: Option<&CustomerAddress>,
    ) -> Result<Customer, StripeError> {
        let mut form = vec![("email".to_string(), email.to_string())];
        if let Some(name) = name {
            form.push(("name".to_string(), name.to_string()));
        }
        if let Some(addr) = address {
            if let Some(line1) = &addr.line1 {
                form.push(("address[line1]".to_string(), line1.clone()));
            }
            if let Some(city) = &addr.city {
                form.push(("address[city]".to_string(), city.clone()));
            }
            if let Some(postal_code) = &addr.postal_code {
                form.push(("address[postal_code]".to_string(), postal_code.clone()));
            }
            if let Some(country) = &addr.country {
                form.push(("address[country]".to_string(), country.clone()));
            }
        }

        let response = self
            .http
            .post(format!("{}/customers", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Verify the signature header and reconstruct the event from the raw body.
    pub fn construct_event(
        &self,
        payload: &[u8],
        sig_header: &str,
    ) -> Result<Event, StripeError> {
        webhook::construct_event(payload, sig_header, &self.webhook_secret)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}
