pub(super) const MIN_TIMEOUT_MS: u64 = 1;

pub(super) fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

pub(super) fn default_request_timeout_ms() -> u64 {
    10_000
}

pub(super) fn default_health_timeout_ms() -> u64 {
    5_000
}

pub(super) fn clamp_timeout_ms(value: u64) -> u64 {
    value.max(MIN_TIMEOUT_MS)
}
