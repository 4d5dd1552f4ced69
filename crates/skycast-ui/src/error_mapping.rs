use skycast_core::AppError;

use crate::capabilities::LocationError;
use crate::locale::Locale;

/// Location failure as an app error carrying the localized alert text.
pub fn location_error(e: &LocationError, locale: Locale) -> AppError {
    AppError::Location(e.message(locale).to_string())
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        location_error(&e, Locale::default())
    }
}
