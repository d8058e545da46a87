/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    InvalidArgument(String),
    /// The requested controller does not exist in the parsed file
    NotFound { class: String },
    /// A marker attribute value does not have the expected shape
    MalformedMarker {
        method: String,
        key: String,
        expected: &'static str,
    },
    /// No response type is available after overrides and signature inspection
    UnresolvedResponseType { method: String },
    /// The declaration tree violates a structural precondition
    InvalidDeclaration { class: String, message: String },
}

impl Error {
    /// Whether this error only affects a single method and extraction may continue
    pub fn is_method_local(&self) -> bool {
        matches!(
            self,
            Error::MalformedMarker { .. } | Error::UnresolvedResponseType { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "无效参数: {}", msg),
            Error::NotFound { class } => write!(f, "未找到控制器: {}", class),
            Error::MalformedMarker {
                method,
                key,
                expected,
            } => write!(
                f,
                "方法 {} 的标记格式错误: `{}` 应为 {}",
                method, key, expected
            ),
            Error::UnresolvedResponseType { method } => {
                write!(f, "方法 {} 无法确定返回类型", method)
            }
            Error::InvalidDeclaration { class, message } => {
                write!(f, "无效的声明 {}: {}", class, message)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_local_errors() {
        let malformed = Error::MalformedMarker {
            method: "list".to_string(),
            key: "url".to_string(),
            expected: "a string literal",
        };
        let unresolved = Error::UnresolvedResponseType {
            method: "list".to_string(),
        };
        let invalid = Error::InvalidDeclaration {
            class: "UserController".to_string(),
            message: "empty method name".to_string(),
        };

        assert!(malformed.is_method_local());
        assert!(unresolved.is_method_local());
        assert!(!invalid.is_method_local());
        assert!(!Error::NotFound { class: "X".to_string() }.is_method_local());
    }

    #[test]
    fn test_display_mentions_subject() {
        let err = Error::MalformedMarker {
            method: "create".to_string(),
            key: "result".to_string(),
            expected: "a type",
        };
        let text = err.to_string();
        assert!(text.contains("create"));
        assert!(text.contains("result"));
    }
}
