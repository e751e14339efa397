//! Shop identity extractor.
//!
//! The admin-session authenticator (an external collaborator in front of
//! this service) verifies the merchant session and forwards the shop
//! domain in the `X-Shopify-Shop-Domain` header. This extractor recovers
//! it; requests without a valid shop are rejected before any handler runs.

use axum::{extract::FromRequestParts, http::request::Parts};

use dtf_reseller_core::ShopDomain;

use crate::error::AppError;

/// Header set by the upstream session authenticator.
pub const SHOP_HEADER: &str = "x-shopify-shop-domain";

/// Extractor that requires an authenticated shop.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireShop(shop): RequireShop) -> impl IntoResponse {
///     format!("Hello, {shop}!")
/// }
/// ```
pub struct RequireShop(pub ShopDomain);

impl<S> FromRequestParts<S> for RequireShop
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHOP_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing shop identity header".to_string()))?;

        let shop = ShopDomain::parse(raw).map_err(|e| {
            tracing::warn!(error = %e, "Rejected request with invalid shop header");
            AppError::Unauthorized("invalid shop identity header".to_string())
        })?;

        Ok(Self(shop))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<RequireShop, AppError> {
        let mut builder = Request::builder().uri("/app/dtf-tool");
        if let Some(value) = header {
            builder = builder.header(SHOP_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        RequireShop::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_valid_shop() {
        let RequireShop(shop) = extract(Some("store.myshopify.com")).await.ok().unwrap();
        assert_eq!(shop.as_str(), "store.myshopify.com");
    }

    #[tokio::test]
    async fn test_rejects_missing_header() {
        assert!(extract(None).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_invalid_domain() {
        assert!(extract(Some("bad domain")).await.is_err());
    }
}
