//! Apply Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{
    carts::{CartsServiceError, summary::CouponApplication},
    coupons::rules::CouponRejection,
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponRequest {
    pub coupon_code: String,
}

/// Why a coupon could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CouponFailureKind {
    NoCart,
    AlreadyUsed,
    Invalid,
    NotFound,
}

impl CouponFailureKind {
    fn status_code(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NoCart | Self::AlreadyUsed | Self::Invalid => StatusCode::BAD_REQUEST,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::NoCart => "No active cart found.",
            Self::AlreadyUsed => "You have already used this coupon.",
            Self::Invalid => "This coupon is invalid or expired.",
            Self::NotFound => "Coupon not found.",
        }
    }
}

/// Apply Coupon Response
///
/// On success `message` and the amounts are set; on failure `error` and `kind` are.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Subtotal after the discount, in poisha
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_subtotal: Option<u64>,

    /// Grand total including fees, in poisha
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u64>,

    /// e.g. `20% off`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_display: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CouponFailureKind>,
}

impl From<CouponApplication> for ApplyCouponResponse {
    fn from(application: CouponApplication) -> Self {
        Self {
            success: true,
            message: Some(application.message()),
            new_subtotal: Some(application.new_subtotal),
            new_total: Some(application.new_total),
            discount: Some(application.discount),
            discount_display: Some(application.discount_display),
            ..Self::default()
        }
    }
}

impl From<CouponFailureKind> for ApplyCouponResponse {
    fn from(kind: CouponFailureKind) -> Self {
        Self {
            success: false,
            error: Some(kind.message().to_string()),
            kind: Some(kind),
            ..Self::default()
        }
    }
}

fn failure_kind(error: &CartsServiceError) -> Option<CouponFailureKind> {
    match error {
        CartsServiceError::NoOpenCart => Some(CouponFailureKind::NoCart),
        CartsServiceError::CouponNotFound => Some(CouponFailureKind::NotFound),
        CartsServiceError::CouponRejected(CouponRejection::AlreadyUsed) => {
            Some(CouponFailureKind::AlreadyUsed)
        }
        CartsServiceError::CouponRejected(_) => Some(CouponFailureKind::Invalid),
        _ => None,
    }
}

/// Apply Coupon Handler
///
/// Attaches a coupon to the open cart. The coupon is consumed at checkout, not here.
#[endpoint(
    tags("carts"),
    summary = "Apply Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applied"),
        (status_code = StatusCode::BAD_REQUEST, description = "No cart, already used or invalid coupon"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.apply_coupon",
    skip(json, depot, res),
    fields(customer_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApplyCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    tracing::Span::current().record("customer_uuid", tracing::field::display(customer));

    let code = json.into_inner().coupon_code;

    match state
        .app
        .carts
        .apply_coupon(customer, &code, Timestamp::now())
        .await
    {
        Ok(application) => Ok(Json(application.into())),
        Err(error) => {
            let Some(kind) = failure_kind(&error) else {
                return Err(into_status_error(error));
            };

            res.status_code(kind.status_code());

            Ok(Json(kind.into()))
        }
    }
}
