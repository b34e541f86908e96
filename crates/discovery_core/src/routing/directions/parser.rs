use super::response::DirectionsResponse;
use crate::routing::{RouteSummary, RoutingError};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Map a decoded payload onto the routing outcome.
///
/// `OK` with a populated first leg yields a summary. `ZERO_RESULTS`, and an
/// `OK` payload carrying no routes or no legs, mean no route exists between
/// the endpoints. Any other status is a backend failure, as is an `OK` leg
/// that omits its duration.
pub(super) fn parse_directions_response(
    resp: DirectionsResponse,
) -> Result<RouteSummary, RoutingError> {
    match resp.status.as_str() {
        STATUS_OK => {}
        STATUS_ZERO_RESULTS => return Err(RoutingError::NoRoute),
        other => {
            let detail = resp
                .error_message
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(RoutingError::Unavailable(format!(
                "status {}: {}",
                other, detail
            )));
        }
    }

    let leg = match resp
        .routes
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|route| route.legs.unwrap_or_default().into_iter().next())
    {
        Some(leg) => leg,
        None => return Err(RoutingError::NoRoute),
    };

    let duration = leg
        .duration
        .ok_or_else(|| RoutingError::Unavailable("leg missing duration".to_string()))?;

    Ok(RouteSummary {
        duration_secs: duration.value,
        distance_m: leg.distance.map(|distance| distance.value),
    })
}
