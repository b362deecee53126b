use super::*;

#[test]
fn config_endpoint_is_under_api() {
    assert_eq!(CONFIG_ENDPOINT, "/api/config");
}

#[test]
fn config_request_failed_message_formats_status() {
    assert_eq!(config_request_failed_message(503), "config request failed: 503");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn fetch_store_config_is_unavailable_natively() {
    let result = futures::executor::block_on(fetch_store_config());
    assert_eq!(result, Err("not available on server".to_owned()));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn connected_store_is_not_configured_natively() {
    let result = futures::executor::block_on(connected_store());
    assert!(matches!(result, Err(StoreError::NotConfigured)));
}
