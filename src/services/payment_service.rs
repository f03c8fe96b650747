// ==================== PAYMENT INTENTS ====================
// Charge authorizations are requested from the processor, never persisted locally

use crate::{models::PaymentIntentResponse, utils::AppError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Processor-side configuration, not business logic
pub const CURRENCY: &str = "usd";
pub const PAYMENT_METHODS: &[&str] = &["card"];

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        methods: &[&str],
    ) -> Result<PaymentIntent, AppError>;
}

pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: &str, secret_key: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        methods: &[&str],
    ) -> Result<PaymentIntent, AppError> {
        let url = format!("{}/v1/payment_intents", self.api_base);

        let mut form = vec![
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
        ];
        form.extend(methods.iter().map(|m| ("payment_method_types[]", m.to_string())));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ProcessorError(format!("Failed to reach processor: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(AppError::ProcessorError(format!("{}: {}", status, detail)));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::ProcessorError(format!("Failed to parse payment intent: {}", e)))
    }
}

/// Major units to integer minor units. Truncates (12.345 -> 1234), never rounds.
pub fn to_minor_units(amount: &serde_json::Value) -> Result<i64, AppError> {
    let major = amount
        .as_f64()
        .ok_or_else(|| AppError::InvalidAmount(format!("{} is not a number", amount)))?;

    if !major.is_finite() || major <= 0.0 {
        return Err(AppError::InvalidAmount(format!("{} must be greater than zero", major)));
    }

    let minor = (major * 100.0).trunc();
    if minor < 1.0 {
        return Err(AppError::InvalidAmount(format!("{} is below the smallest unit", major)));
    }
    if minor >= i64::MAX as f64 {
        return Err(AppError::InvalidAmount(format!("{} is too large", major)));
    }

    Ok(minor as i64)
}

/// Validates before anything reaches the processor, returns only the client secret.
pub async fn create_intent(
    processor: &dyn PaymentProcessor,
    amount: &serde_json::Value,
) -> Result<PaymentIntentResponse, AppError> {
    let amount_minor = to_minor_units(amount)?;

    log::info!("💳 Requesting payment intent: {} {} (minor units)", amount_minor, CURRENCY);

    let intent = processor
        .create_payment_intent(amount_minor, CURRENCY, PAYMENT_METHODS)
        .await?;

    log::info!(
        "✅ Payment intent created: {} ({} {})",
        intent.id,
        intent.amount,
        intent.currency
    );

    Ok(PaymentIntentResponse { client_secret: intent.client_secret })
}
