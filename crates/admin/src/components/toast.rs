//! Toast notifications delivered through the `HX-Trigger` response header.
//!
//! HTMX dispatches every key of the header's JSON object as a DOM event on
//! the requesting element. `static/admin.js` listens for `toast` and renders
//! the notification; the products table listens for `products-changed` and
//! re-fetches itself.

use std::fmt::Write;

use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use serde::Serialize;
use serde_json::{Map, Value};

/// `HX-Trigger` header name.
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Event the products table refreshes on.
pub const PRODUCTS_CHANGED_EVENT: &str = "products-changed";

const TOAST_EVENT: &str = "toast";

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Events to fire on the client after a response is swapped in.
///
/// Used as a response part:
///
/// ```rust,ignore
/// (StatusCode::OK, HxTrigger::toast(Toast::success("Saved")).products_changed(), "")
/// ```
#[derive(Debug, Clone, Default)]
pub struct HxTrigger {
    events: Map<String, Value>,
}

impl HxTrigger {
    /// Trigger carrying a single toast.
    #[must_use]
    pub fn toast(toast: Toast) -> Self {
        Self::default().with_toast(toast)
    }

    /// Add (or replace) the toast event.
    #[must_use]
    pub fn with_toast(mut self, toast: Toast) -> Self {
        let value = serde_json::to_value(toast).unwrap_or(Value::Null);
        self.events.insert(TOAST_EVENT.to_string(), value);
        self
    }

    /// Ask the products table to reload.
    #[must_use]
    pub fn products_changed(mut self) -> Self {
        self.events
            .insert(PRODUCTS_CHANGED_EVENT.to_string(), Value::Bool(true));
        self
    }

    /// Header value: the events as JSON, with non-ASCII escaped as `\uXXXX`.
    #[must_use]
    pub fn header_value(&self) -> String {
        escape_non_ascii(&Value::Object(self.events.clone()).to_string())
    }
}

impl IntoResponseParts for HxTrigger {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.events.is_empty() {
            return Ok(res);
        }

        match HeaderValue::from_str(&self.header_value()) {
            Ok(value) => {
                res.headers_mut().insert(HX_TRIGGER, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping unencodable HX-Trigger header"),
        }
        Ok(res)
    }
}

/// Header values must be visible ASCII; JSON allows `\u` escapes everywhere
/// inside strings, and non-ASCII only ever appears inside strings.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}
