/// Wire schema for the directions service.
///
/// Every level below `status` is optional so a sparse or truncated payload
/// decodes instead of erroring; the parser decides what each shape means.
#[derive(serde::Deserialize)]
pub(super) struct DirectionsResponse {
    pub(super) status: String,
    pub(super) routes: Option<Vec<DirectionsRoute>>,
    pub(super) error_message: Option<String>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsRoute {
    pub(super) legs: Option<Vec<DirectionsLeg>>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsLeg {
    pub(super) duration: Option<ValueField>,
    pub(super) distance: Option<ValueField>,
}

/// The service wraps scalars as `{ "value": 642, "text": "11 mins" }`;
/// only the numeric value matters here.
#[derive(serde::Deserialize)]
pub(super) struct ValueField {
    pub(super) value: f64,
}
