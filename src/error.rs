use rmcp::model::ErrorCode;
use rmcp::ErrorData as McpError;
use thiserror::Error;

pub(crate) const TIMEOUT_MESSAGE: &str =
    "Request timed out, check the network connection or the server status";
pub(crate) const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the Prompt Share server, check that it is running";

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity,

    #[error("API request failed: {message}")]
    UpstreamCall { status: u16, message: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Convert to the error reported back to the MCP host.
    ///
    /// Unknown tools keep their identity; everything else is reported as a
    /// failed tool execution carrying the original message.
    pub fn to_mcp_error(&self) -> McpError {
        match self {
            BridgeError::MethodNotFound(_) => {
                McpError::new(ErrorCode::METHOD_NOT_FOUND, self.to_string(), None)
            }
            other => {
                McpError::internal_error(format!("Tool execution failed: {}", other), None)
            }
        }
    }
}

impl From<BridgeError> for McpError {
    fn from(err: BridgeError) -> Self {
        err.to_mcp_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_keeps_code() {
        let err = BridgeError::MethodNotFound("drop_tables".to_string()).to_mcp_error();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("drop_tables"));
    }

    #[test]
    fn test_other_errors_become_internal() {
        let errors = vec![
            BridgeError::Timeout,
            BridgeError::Connectivity,
            BridgeError::UpstreamCall {
                status: 403,
                message: "forbidden".to_string(),
            },
            BridgeError::InvalidArguments("rating".to_string()),
            BridgeError::Configuration("API key".to_string()),
        ];

        for err in errors {
            let original = err.to_string();
            let mcp = err.to_mcp_error();
            assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
            assert!(mcp.message.starts_with("Tool execution failed: "));
            assert!(mcp.message.contains(&original));
        }
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::UpstreamCall {
            status: 400,
            message: "bad title".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: bad title");
        assert_eq!(BridgeError::Timeout.to_string(), TIMEOUT_MESSAGE);
        assert_eq!(BridgeError::Connectivity.to_string(), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: BridgeError = json_err.into();
        assert!(matches!(err, BridgeError::Json(_)));
    }

    #[test]
    fn test_into_mcp_error() {
        let err: McpError = BridgeError::MethodNotFound("drop_tables".to_string()).into();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);

        let err: McpError = BridgeError::Timeout.into();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains(TIMEOUT_MESSAGE));
    }
}
