use std::time::Duration;

use super::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_HTTP_TIMEOUT};

pub(super) const fn default_request_timeout() -> Duration {
    DEFAULT_HTTP_TIMEOUT
}

pub(super) const fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}
