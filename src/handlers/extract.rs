//! Request extractors whose rejections render as [`CatalogError`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::CatalogError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(CatalogError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CatalogError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(CatalogError))]
pub struct ApiQuery<T>(pub T);
