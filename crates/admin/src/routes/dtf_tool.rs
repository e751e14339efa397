//! DTF quote tool route handlers.
//!
//! A single form endpoint dispatched on the `intent` field, mirroring the
//! admin panel's form contract: `calculate` prices a quote, `save_quote`
//! writes a previously calculated quote into the shop's Dropbox.
//!
//! All numeric form fields arrive as strings; cost and markup fields fall
//! back to tool defaults when absent, while dimensions fall back to zero
//! and are caught by validation.

use axum::{Form, Json, extract::State, response::IntoResponse, response::Response};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dtf_reseller_core::{QuoteInput, QuoteResult, ShopDomain, calculate};

use crate::middleware::RequireShop;
use crate::state::AppState;

/// Default blank product cost per unit.
const DEFAULT_PRODUCT_COST: Decimal = Decimal::from_parts(286, 0, 0, false, 2);
/// Default heat press charge per unit.
const DEFAULT_PRESS_COST: Decimal = Decimal::from_parts(175, 0, 0, false, 2);
/// Default markup percentage.
const DEFAULT_MARKUP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Quote tool form submission.
#[derive(Debug, Deserialize)]
pub struct ToolForm {
    /// Which action the form requests: `calculate` or `save_quote`.
    pub intent: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub quantity: Option<String>,
    #[serde(rename = "productCost")]
    pub product_cost: Option<String>,
    #[serde(rename = "pressCost")]
    pub press_cost: Option<String>,
    pub markup: Option<String>,
    #[serde(rename = "quoteData")]
    pub quote_data: Option<String>,
    #[serde(rename = "quoteName")]
    pub quote_name: Option<String>,
}

/// Error payload: `{error, type}`.
#[derive(Debug, Serialize)]
pub struct ToolError {
    pub error: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Successful calculation payload: `{success, type, results}`.
#[derive(Debug, Serialize)]
pub struct CalculateSuccess {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub results: QuoteResults,
}

/// Successful save payload: `{success, type, message}`.
#[derive(Debug, Serialize)]
pub struct SaveSuccess {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
}

/// Quote breakdown with every numeric field as a 2-decimal string.
#[derive(Debug, Serialize)]
pub struct QuoteResults {
    pub area: String,
    #[serde(rename = "totalArea")]
    pub total_area: String,
    #[serde(rename = "imprintCost")]
    pub imprint_cost: String,
    #[serde(rename = "totalProductCost")]
    pub total_product_cost: String,
    #[serde(rename = "totalPressCost")]
    pub total_press_cost: String,
    #[serde(rename = "totalCost")]
    pub total_cost: String,
    #[serde(rename = "unitCost")]
    pub unit_cost: String,
    #[serde(rename = "retailUnit")]
    pub retail_unit: String,
    #[serde(rename = "retailTotal")]
    pub retail_total: String,
    #[serde(rename = "totalProfit")]
    pub total_profit: String,
}

impl From<&QuoteResult> for QuoteResults {
    fn from(result: &QuoteResult) -> Self {
        let rounded = result.rounded();
        let s = |d: Decimal| format!("{d:.2}");
        Self {
            area: s(rounded.area),
            total_area: s(rounded.total_area),
            imprint_cost: s(rounded.imprint_cost),
            total_product_cost: s(rounded.total_product_cost),
            total_press_cost: s(rounded.total_press_cost),
            total_cost: s(rounded.total_cost),
            unit_cost: s(rounded.unit_cost),
            retail_unit: s(rounded.retail_unit),
            retail_total: s(rounded.retail_total),
            total_profit: s(rounded.total_profit),
        }
    }
}

/// Handle a quote tool form submission.
///
/// # Route
///
/// `POST /app/dtf-tool`
#[instrument(skip(state, form), fields(shop = %shop, intent = %form.intent))]
pub async fn action(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Form(form): Form<ToolForm>,
) -> Response {
    match form.intent.as_str() {
        "calculate" => handle_calculate(&state, &form),
        "save_quote" => handle_save_quote(&state, &shop, &form).await,
        _ => Json(ToolError {
            error: "Invalid action".to_string(),
            kind: "unknown",
        })
        .into_response(),
    }
}

/// Price a quote from the submitted form fields.
fn handle_calculate(state: &AppState, form: &ToolForm) -> Response {
    let input = match parse_input(form) {
        Ok(input) => input,
        Err(message) => {
            return Json(ToolError {
                error: message,
                kind: "calculate",
            })
            .into_response();
        }
    };

    match calculate(&input, &state.config().pricing) {
        Ok(result) => Json(CalculateSuccess {
            success: true,
            kind: "calculate",
            results: QuoteResults::from(&result),
        })
        .into_response(),
        Err(e) => Json(ToolError {
            error: e.to_string(),
            kind: "calculate",
        })
        .into_response(),
    }
}

/// Save a calculated quote into the shop's Dropbox.
async fn handle_save_quote(state: &AppState, shop: &ShopDomain, form: &ToolForm) -> Response {
    let error = |message: &str| {
        Json(ToolError {
            error: message.to_string(),
            kind: "save_quote",
        })
        .into_response()
    };

    // The quote payload must be the JSON the calculate intent returned
    let Some(raw) = form.quote_data.as_deref() else {
        return error("No quote to save");
    };
    let Ok(quote) = serde_json::from_str::<serde_json::Value>(raw) else {
        return error("Quote data is not valid JSON");
    };

    let Some(token) = state.tokens().get(shop).await else {
        return error("Connect Dropbox before saving quotes");
    };

    let name = form
        .quote_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("DTF Quote")
        .replace('/', "-");
    let path = format!("/quotes/{name}.json");

    let body = match serde_json::to_vec_pretty(&quote) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize quote payload");
            return error("Failed to serialize quote");
        }
    };

    match state
        .dropbox()
        .upload(token.access_token.expose_secret(), &path, body)
        .await
    {
        Ok(metadata) => {
            tracing::info!(shop = %shop, file = %metadata.name, "Quote saved to Dropbox");
            Json(SaveSuccess {
                success: true,
                kind: "save_quote",
                message: "Quote saved to Dropbox successfully!".to_string(),
            })
            .into_response()
        }
        Err(e) => {
            tracing::warn!(shop = %shop, error = %e, "Failed to save quote to Dropbox");
            error("Failed to save quote to Dropbox")
        }
    }
}

/// Build a [`QuoteInput`] from the form fields.
///
/// Absent or empty fields fall back to their defaults; a field that is
/// present but not a number is an error, never a silent default. Zeroed
/// dimensions are left for the pricing engine's own validation.
fn parse_input(form: &ToolForm) -> Result<QuoteInput, String> {
    Ok(QuoteInput {
        width: parse_decimal(form.width.as_deref(), Decimal::ZERO, "width")?,
        height: parse_decimal(form.height.as_deref(), Decimal::ZERO, "height")?,
        quantity: parse_quantity(form.quantity.as_deref())?,
        product_cost: parse_decimal(
            form.product_cost.as_deref(),
            DEFAULT_PRODUCT_COST,
            "product cost",
        )?,
        press_cost: parse_decimal(form.press_cost.as_deref(), DEFAULT_PRESS_COST, "press cost")?,
        markup_percent: parse_decimal(form.markup.as_deref(), DEFAULT_MARKUP, "markup")?,
    })
}

/// Parse a stringified decimal field, falling back to `default` when the
/// field is absent or empty.
fn parse_decimal(raw: Option<&str>, default: Decimal, field: &str) -> Result<Decimal, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| format!("{field} is not a number")),
    }
}

/// Parse the quantity field; an absent field becomes zero and is rejected
/// by validation.
fn parse_quantity(raw: Option<&str>) -> Result<u32, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(0),
        Some(s) => s
            .parse()
            .map_err(|_| "quantity is not a whole number".to_string()),
    }
}
