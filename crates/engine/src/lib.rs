//! Mock execution engine.
//!
//! Given the current selection and parameter map, the engine produces a
//! synthetic response envelope: success flag, request timestamp, echoed
//! server address and display names, echoed params, and a nested data object
//! with filler fields and a fixed-size row array whose shape depends on the
//! service id. Values are drawn from non-seeded randomness, so content is
//! not reproducible across runs; only the shape is deterministic per
//! service.
//!
//! The engine is pure and synchronous. The artificial request latency and
//! the pending sentinel live at the execution boundary (TUI command layer /
//! CLI), which is also responsible for never leaving a result slot pending:
//! any failure while building the payload is replaced by the generic error
//! object via [`execute`].

use std::time::Duration;

use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::warn;

mod mock;

pub use mock::build_envelope;

/// Fixed artificial latency applied by execution boundaries.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

/// Number of synthetic rows generated per response.
pub const ROW_COUNT: usize = 20;

/// Sentinel stored in the result slot while a request is in flight.
pub const PENDING_SENTINEL: &str = "正在请求...";

/// Message of the error result produced when service, function, or server is
/// missing at execution time.
pub const MISSING_SELECTION_MESSAGE: &str = "请选择服务、功能和服务器";

/// Message of the error result that replaces a failed payload build.
pub const GENERATION_ERROR_MESSAGE: &str = "生成测试结果时出错";

/// Error raised while constructing the synthetic payload.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Serialization failure while encoding the envelope.
    #[error("envelope serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything the engine needs to know about one simulated request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Id of the selected service; chooses the row shape
    pub service_id: String,
    /// Display name of the selected service, echoed into the envelope
    pub service_name: String,
    /// Display name of the selected function, echoed into the envelope
    pub function_name: String,
    /// Address of the selected server; display-only, never dereferenced
    pub server_address: String,
    /// Full parameter value map
    pub params: Map<String, Value>,
}

/// Build the envelope and serialize it to the raw result text.
///
/// Any failure is caught and replaced with the generic error object, so the
/// caller can always resolve its pending state with the returned text.
pub fn execute(request: &MockRequest) -> String {
    let rendered = build_envelope(request)
        .and_then(|envelope| serde_json::to_string_pretty(&envelope).map_err(EngineError::from));
    match rendered {
        Ok(text) => text,
        Err(error) => {
            warn!(error = %error, "Failed to build synthetic payload");
            generation_error_result()
        }
    }
}

/// The error result for an execution attempted without a complete selection.
pub fn missing_selection_result() -> String {
    error_result(MISSING_SELECTION_MESSAGE)
}

/// The generic error result replacing a failed payload build.
pub fn generation_error_result() -> String {
    error_result(GENERATION_ERROR_MESSAGE)
}

fn error_result(message: &str) -> String {
    serde_json::to_string_pretty(&json!({ "error": message }))
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_request() -> MockRequest {
        let mut params = Map::new();
        params.insert("orderId".into(), Value::String("ORD-2023-001".into()));
        MockRequest {
            service_id: "order".into(),
            service_name: "订单服务".into(),
            function_name: "查询订单".into(),
            server_address: "http://dev-api.example.com/order".into(),
            params,
        }
    }

    #[test]
    fn envelope_echoes_request_context() {
        let request = order_request();
        let envelope = build_envelope(&request).unwrap();

        assert_eq!(envelope["success"], Value::Bool(true));
        assert_eq!(envelope["server"], json!("http://dev-api.example.com/order"));
        assert_eq!(envelope["service"], json!("订单服务"));
        assert_eq!(envelope["function"], json!("查询订单"));
        assert_eq!(envelope["params"]["orderId"], json!("ORD-2023-001"));
        assert_eq!(envelope["result"]["code"], json!(200));
        assert_eq!(envelope["result"]["message"], json!("操作成功"));
        // Params are echoed into the data object as well.
        assert_eq!(envelope["result"]["data"]["orderId"], json!("ORD-2023-001"));
    }

    #[test]
    fn order_rows_carry_order_specific_fields() {
        let envelope = build_envelope(&order_request()).unwrap();
        let rows = envelope["result"]["data"]["arrayData"].as_array().unwrap();
        assert_eq!(rows.len(), ROW_COUNT);
        for row in rows {
            assert!(row.get("orderNumber").is_some());
            assert!(row.get("orderStatus").is_some());
            assert!(row.get("productCode").is_none());
        }
    }

    #[test]
    fn product_rows_carry_product_specific_fields() {
        let mut request = order_request();
        request.service_id = "product".into();
        let envelope = build_envelope(&request).unwrap();
        let rows = envelope["result"]["data"]["arrayData"].as_array().unwrap();
        for row in rows {
            assert!(row.get("productCode").is_some());
            assert!(row.get("orderNumber").is_none());
        }
    }

    #[test]
    fn generic_rows_have_only_base_fields() {
        let mut request = order_request();
        request.service_id = "user".into();
        let envelope = build_envelope(&request).unwrap();
        let rows = envelope["result"]["data"]["arrayData"].as_array().unwrap();
        for row in rows {
            assert!(row.get("orderNumber").is_none());
            assert!(row.get("productCode").is_none());
            assert!(row.get("index").is_some());
        }
    }

    #[test]
    fn row_keys_keep_first_seen_order() {
        let envelope = build_envelope(&order_request()).unwrap();
        let rows = envelope["result"]["data"]["arrayData"].as_array().unwrap();
        let keys: Vec<&str> = rows[0].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(&keys[..3], &["index", "id", "value"]);
    }

    #[test]
    fn statuses_cycle_by_row_index() {
        let envelope = build_envelope(&order_request()).unwrap();
        let rows = envelope["result"]["data"]["arrayData"].as_array().unwrap();
        assert_eq!(rows[0]["status"], json!("成功"));
        assert_eq!(rows[1]["status"], json!("处理中"));
        assert_eq!(rows[2]["status"], json!("失败"));
        assert_eq!(rows[3]["status"], json!("成功"));
    }

    #[test]
    fn execute_yields_parseable_text() {
        let text = execute(&order_request());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["success"], Value::Bool(true));
    }

    #[test]
    fn error_results_are_json_objects() {
        let parsed: Value = serde_json::from_str(&missing_selection_result()).unwrap();
        assert_eq!(parsed["error"], json!(MISSING_SELECTION_MESSAGE));
        let parsed: Value = serde_json::from_str(&generation_error_result()).unwrap();
        assert_eq!(parsed["error"], json!(GENERATION_ERROR_MESSAGE));
    }

    #[test]
    fn pending_sentinel_is_not_valid_json() {
        assert!(serde_json::from_str::<Value>(PENDING_SENTINEL).is_err());
    }
}
