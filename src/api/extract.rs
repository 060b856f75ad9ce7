//! Request extractors whose rejections render as envelopes.
//!
//! `axum::Json` and `axum::extract::Path` answer malformed input with a
//! plain-text body. These wrappers route the same rejections through
//! [`ApiErrorResponse`] so every failure keeps the `{data, response}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiErrorResponse;

/// JSON body extractor.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiErrorResponse))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiErrorResponse))]
pub struct ApiPath<T>(pub T);
