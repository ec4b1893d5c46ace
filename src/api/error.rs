//! Classification of failed API requests

use thiserror::Error;

/// A failed request to the Keyvaultify API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid or expired API token. Run `keyvault login` to authenticate.")]
    Unauthorized,

    #[error("Insufficient permissions. You may not have access to this resource.")]
    Forbidden,

    #[error("Resource not found. The project or environment may not exist.")]
    NotFound,

    #[error("Too many requests. Please wait before trying again.")]
    RateLimited,

    #[error("Server error occurred. Please try again later.")]
    Server,

    /// Any other non-success status; `message` comes from the response body
    /// when the server provided one
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response was received
    #[error("Unable to connect to Keyvaultify API ({0}). Check your internet connection.")]
    Network(String),

    /// A success response whose body could not be understood
    #[error("Unexpected response from Keyvaultify API: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Map an HTTP status and optional body message to an error
    pub fn from_status(status: u16, body_message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500 => Self::Server,
            _ => Self::Status {
                status,
                message: body_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
        }
    }

    /// HTTP status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::RateLimited => Some(429),
            Self::Server => Some(500),
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::InvalidResponse(_) => None,
        }
    }

    /// Remediation hints shown beneath the error
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Self::Unauthorized => &[
                "Run `keyvault login` to get a new token",
                "Check your token in ~/.keyvaultify/config.json",
            ],
            Self::Forbidden => &[
                "Check your role in the organization",
                "Contact your admin for access",
            ],
            Self::NotFound => &[
                "Run `keyvault projects list` to see available projects",
                "Check your project ID",
            ],
            Self::RateLimited => &[
                "Wait a few minutes before retrying",
                "Consider reducing the frequency of requests",
            ],
            Self::Server => &[
                "Try again in a few minutes",
                "Check https://status.keyvaultify.com for updates",
            ],
            Self::Status { .. } => &[
                "Check your internet connection",
                "Verify the API endpoint is correct",
            ],
            Self::Network(_) => &[
                "Check your internet connection",
                "Verify the API URL is correct (KEYVAULTIFY_API_URL)",
                "Check if the service is running",
            ],
            Self::InvalidResponse(_) => &[
                "Verify the API URL points at a Keyvaultify server",
                "Run with --verbose for more details",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(403, None), ApiError::Forbidden);
        assert_eq!(ApiError::from_status(404, None), ApiError::NotFound);
        assert_eq!(ApiError::from_status(429, None), ApiError::RateLimited);
        assert_eq!(ApiError::from_status(500, None), ApiError::Server);
    }

    #[test]
    fn test_other_status_uses_body_message() {
        let err = ApiError::from_status(422, Some("Invalid secret key".into()));
        assert_eq!(err.to_string(), "Invalid secret key");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_other_status_without_message() {
        let err = ApiError::from_status(502, None);
        assert_eq!(err.to_string(), "Request failed with status 502");

        let err = ApiError::from_status(418, Some(String::new()));
        assert_eq!(err.to_string(), "Request failed with status 418");
    }

    #[test]
    fn test_network_has_no_status() {
        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.suggestions().len(), 3);
    }
}
