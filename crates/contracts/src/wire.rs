//! Names shared by the widget and the endpoint it queries.

/// Custom event dispatched on every subscriber after a fetch completes.
pub const FETCHED_EVENT: &str = "livefilterfetched";

/// Property on the dispatched event that carries the parsed body.
pub const EVENT_DATA_FIELD: &str = "data";

pub const ACCEPT_HEADER: &str = "Accept";
pub const ACCEPT_JSON: &str = "application/json";

/// Marker header so endpoints can tell widget requests from page loads.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
