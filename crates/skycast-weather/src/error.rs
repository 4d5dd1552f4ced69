//! Weather client errors.

use skycast_core::AppError;
use thiserror::Error;

/// Provider failures normalized to a single displayable message.
///
/// `Clone` because a cached error state is handed to every reader of the
/// query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Transport failure or non-2xx response. `message` is the provider's
    /// own message when it sent one, otherwise the endpoint default.
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The response decoded but lacked the fields the endpoint promises.
    #[error("{0}")]
    InvalidData(String),
}

impl WeatherError {
    /// Message shown in the error banner.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Api { message, .. } => message,
            Self::InvalidData(message) => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        AppError::Weather(e.user_message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_message() {
        let err = WeatherError::Api {
            status: Some(404),
            message: "city not found".into(),
        };
        assert_eq!(err.to_string(), "city not found");
        assert_eq!(err.user_message(), "city not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_invalid_data_has_no_status() {
        let err = WeatherError::InvalidData("bad shape".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message(), "bad shape");
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = WeatherError::InvalidData("bad shape".into()).into();
        assert_eq!(err.user_message(), "bad shape");
    }
}
