//! Inbound body decoding.
//!
//! Every supported body format reduces to a [`NormalizedPayload`]. The format
//! is chosen once from the `Content-Type` header; unknown or missing types
//! are decoded as JSON.

use crate::models::NormalizedPayload;
use crate::{Error, Result};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap};
use base64::Engine as _;
use serde_json::{Map, Value};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Both 'image' and 'text' fields are required";

/// Declared body format of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
    UrlEncoded,
}

impl BodyKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("multipart/form-data") {
            BodyKind::Multipart
        } else if content_type.contains("application/x-www-form-urlencoded") {
            BodyKind::UrlEncoded
        } else {
            BodyKind::Json
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_content_type)
            .unwrap_or(BodyKind::Json)
    }
}

/// Decode `request` according to `kind`. Absent fields come back empty.
pub async fn extract_payload(
    kind: BodyKind,
    request: Request,
    max_body_bytes: usize,
) -> Result<NormalizedPayload> {
    match kind {
        BodyKind::Json => extract_json(request, max_body_bytes).await,
        BodyKind::Multipart => extract_multipart(request).await,
        BodyKind::UrlEncoded => extract_url_encoded(request, max_body_bytes).await,
    }
}

async fn extract_json(request: Request, max_body_bytes: usize) -> Result<NormalizedPayload> {
    let bytes = read_body(request, max_body_bytes).await?;

    // A map keeps the last value of a repeated key instead of rejecting it.
    let body: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidBody(e.to_string()))?;

    Ok(NormalizedPayload::new(
        json_string_field(&body, "image")?,
        json_string_field(&body, "text")?,
    ))
}

/// `null` and absent fields read as empty; any other non-string is rejected.
fn json_string_field(body: &Map<String, Value>, key: &str) -> Result<String> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(Error::InvalidBody(format!(
            "field '{}' must be a string, got {}",
            key, other
        ))),
    }
}

async fn read_body(request: Request, max_body_bytes: usize) -> Result<axum::body::Bytes> {
    axum::body::to_bytes(request.into_body(), max_body_bytes)
        .await
        .map_err(|e| Error::InvalidBody(e.to_string()))
}

async fn extract_multipart(request: Request) -> Result<NormalizedPayload> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| Error::InvalidBody(e.body_text()))?;

    let mut image: Option<String> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidBody(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") if image.is_none() => {
                if field.file_name().is_some() {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| Error::InvalidBody(e.body_text()))?;
                    tracing::debug!("Received image file part ({} bytes)", bytes.len());
                    image = Some(base64::engine::general_purpose::STANDARD.encode(&bytes));
                } else {
                    image = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| Error::InvalidBody(e.body_text()))?,
                    );
                }
            }
            Some("text") if text.is_none() => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::InvalidBody(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    Ok(NormalizedPayload::new(
        image.unwrap_or_default(),
        text.unwrap_or_default(),
    ))
}

async fn extract_url_encoded(request: Request, max_body_bytes: usize) -> Result<NormalizedPayload> {
    // The kind was already chosen from the header, so decode the bytes
    // directly rather than re-checking the content type.
    let bytes = read_body(request, max_body_bytes).await?;
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(&bytes).map_err(|e| Error::InvalidBody(e.to_string()))?;

    Ok(NormalizedPayload::new(
        first_value(&pairs, "image"),
        first_value(&pairs, "text"),
    ))
}

fn first_value(pairs: &[(String, String)], key: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

/// Strip a `data:image/<subtype>;base64,` prefix, returning only the payload.
///
/// Inputs that do not match that exact shape are returned unchanged.
pub fn normalize_base64(input: &str) -> &str {
    let Some(rest) = input.strip_prefix("data:image/") else {
        return input;
    };
    let Some(separator) = rest.find(';') else {
        return input;
    };
    if separator == 0 {
        return input;
    }
    match rest[separator..].strip_prefix(";base64,") {
        Some(payload) if !payload.is_empty() => payload,
        _ => input,
    }
}

/// Reject empty fields and strip any data-URI prefix from the image.
pub fn validate_and_normalize(payload: NormalizedPayload) -> Result<NormalizedPayload> {
    if payload.image.is_empty() || payload.text.is_empty() {
        return Err(Error::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }

    let image = normalize_base64(&payload.image).to_string();
    Ok(NormalizedPayload {
        image,
        text: payload.text,
    })
}
