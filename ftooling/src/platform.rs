//! Built-in local tools served through the `local://executor` sentinel.
//!
//! ```rust
//! use fschema::{ToolRecord, load_sources};
//! use ftooling::platform::{platform_registry, platform_schema};
//!
//! let registry = platform_registry();
//! let load = load_sources(&[ToolRecord::new(platform_schema().to_string())]);
//!
//! assert!(load.sources[0].is_local());
//! for function in &load.functions {
//!     assert!(registry.contains(&function.name));
//! }
//! ```

use chrono::{SecondsFormat, Utc};
use fprovider::ToolDefinition;
use fschema::LOCAL_EXECUTOR;
use serde_json::{Value, json};

use crate::ToolRegistry;

pub const CURRENT_DATE_TIME: &str = "getCurrentDateTime";
pub const ECHO_ARGUMENTS: &str = "echoArguments";

/// Registry holding every built-in platform tool.
pub fn platform_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register_sync_fn(
        ToolDefinition {
            name: CURRENT_DATE_TIME.to_string(),
            description: "Current UTC date and time".to_string(),
            input_schema: json!({"type": "object", "properties": {}}).to_string(),
        },
        |_args, _context| {
            let now = Utc::now();
            Ok(json!({
                "datetime": now.to_rfc3339_opts(SecondsFormat::Secs, true),
                "unix": now.timestamp(),
            }))
        },
    );

    registry.register_sync_fn(
        ToolDefinition {
            name: ECHO_ARGUMENTS.to_string(),
            description: "Returns the supplied arguments unchanged".to_string(),
            input_schema: json!({"type": "object"}).to_string(),
        },
        |args, _context| Ok(args),
    );

    registry
}

/// OpenAPI document advertising the platform tools.
pub fn platform_schema() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Platform",
            "description": "Built-in tools executed by the relay itself",
            "version": "1.0.0"
        },
        "servers": [{"url": LOCAL_EXECUTOR}],
        "paths": {
            "/datetime": {
                "get": {
                    "operationId": CURRENT_DATE_TIME,
                    "summary": "Get the current UTC date and time"
                }
            },
            "/echo": {
                "post": {
                    "operationId": ECHO_ARGUMENTS,
                    "summary": "Echo the request body back",
                    "requestBody": {
                        "content": {
                            "application/json": {"schema": {"type": "object"}}
                        }
                    }
                }
            }
        }
    })
}
