//! User-facing strings in Vietnamese and English.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use skycast_weather::AirQualityIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Vi,
    En,
}

/// Rows of the detail grid on the weather card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLabel {
    FeelsLike,
    Humidity,
    Pressure,
    WindSpeed,
    Visibility,
    Sunrise,
    Sunset,
    AirQuality,
}

impl Locale {
    /// Map a provider language code (`vi`, `en`, `en_US`, ...) to a locale.
    pub fn from_language(code: &str) -> Self {
        if code.trim().to_ascii_lowercase().starts_with("en") {
            Self::En
        } else {
            Self::Vi
        }
    }

    pub fn app_title(self) -> &'static str {
        match self {
            Self::Vi => "🌤️ Ứng Dụng Thời Tiết",
            Self::En => "🌤️ Weather App",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Vi => "Tra cứu thời tiết nhanh chóng và chính xác",
            Self::En => "Fast and accurate weather lookup",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Self::Vi => "Đang tải dữ liệu thời tiết...",
            Self::En => "Loading weather data...",
        }
    }

    pub fn welcome(self) -> &'static str {
        match self {
            Self::Vi => "🔍 Nhập tên thành phố hoặc sử dụng vị trí hiện tại để xem thời tiết",
            Self::En => "🔍 Enter a city name or use your current location to see the weather",
        }
    }

    pub fn retry(self) -> &'static str {
        match self {
            Self::Vi => "Thử lại",
            Self::En => "Retry",
        }
    }

    pub fn share_title(self) -> &'static str {
        match self {
            Self::Vi => "Thông tin thời tiết",
            Self::En => "Weather information",
        }
    }

    pub fn copied(self) -> &'static str {
        match self {
            Self::Vi => "✓ Đã sao chép vào clipboard",
            Self::En => "✓ Copied to clipboard",
        }
    }

    pub fn history_title(self) -> &'static str {
        match self {
            Self::Vi => "Tìm kiếm gần đây",
            Self::En => "Recent searches",
        }
    }

    pub fn history_empty(self) -> &'static str {
        match self {
            Self::Vi => "Chưa có lịch sử tìm kiếm",
            Self::En => "No search history yet",
        }
    }

    pub fn forecast_header(self, days: usize) -> String {
        match self {
            Self::Vi => format!("Dự báo {} ngày tới", days),
            Self::En => format!("{}-day forecast", days),
        }
    }

    pub fn detail_label(self, label: DetailLabel) -> &'static str {
        use DetailLabel::*;
        match (self, label) {
            (Self::Vi, FeelsLike) => "Cảm giác như",
            (Self::Vi, Humidity) => "Độ ẩm",
            (Self::Vi, Pressure) => "Áp suất",
            (Self::Vi, WindSpeed) => "Tốc độ gió",
            (Self::Vi, Visibility) => "Tầm nhìn",
            (Self::Vi, Sunrise) => "Mặt trời mọc",
            (Self::Vi, Sunset) => "Mặt trời lặn",
            (Self::Vi, AirQuality) => "Chất lượng không khí",
            (Self::En, FeelsLike) => "Feels like",
            (Self::En, Humidity) => "Humidity",
            (Self::En, Pressure) => "Pressure",
            (Self::En, WindSpeed) => "Wind speed",
            (Self::En, Visibility) => "Visibility",
            (Self::En, Sunrise) => "Sunrise",
            (Self::En, Sunset) => "Sunset",
            (Self::En, AirQuality) => "Air quality",
        }
    }

    /// Label for an AQI reading; `None` is "unknown".
    pub fn aqi_label(self, aqi: Option<AirQualityIndex>) -> &'static str {
        use AirQualityIndex::*;
        match (self, aqi) {
            (Self::Vi, Some(Good)) => "Tốt",
            (Self::Vi, Some(Fair)) => "Trung bình",
            (Self::Vi, Some(Moderate)) => "Không tốt cho người nhạy cảm",
            (Self::Vi, Some(Poor)) => "Xấu",
            (Self::Vi, Some(VeryPoor)) => "Rất xấu",
            (Self::Vi, None) => "Không rõ",
            (Self::En, Some(Good)) => "Good",
            (Self::En, Some(Fair)) => "Fair",
            (Self::En, Some(Moderate)) => "Unhealthy for sensitive groups",
            (Self::En, Some(Poor)) => "Poor",
            (Self::En, Some(VeryPoor)) => "Very Poor",
            (Self::En, None) => "Unknown",
        }
    }

    pub fn location_denied(self) -> &'static str {
        match self {
            Self::Vi => "Bạn đã từ chối chia sẻ vị trí",
            Self::En => "You denied the location request",
        }
    }

    pub fn location_unavailable(self) -> &'static str {
        match self {
            Self::Vi => "Không thể xác định vị trí",
            Self::En => "Location information is unavailable",
        }
    }

    pub fn location_timeout(self) -> &'static str {
        match self {
            Self::Vi => "Hết thời gian chờ lấy vị trí",
            Self::En => "The location request timed out",
        }
    }

    pub fn location_failed(self) -> &'static str {
        match self {
            Self::Vi => "Không thể lấy vị trí hiện tại",
            Self::En => "Could not get your current location",
        }
    }

    pub fn location_unsupported(self) -> &'static str {
        match self {
            Self::Vi => "Thiết bị không hỗ trợ định vị",
            Self::En => "Geolocation is not supported on this device",
        }
    }

    pub fn weekday_long(self, day: Weekday) -> &'static str {
        match (self, day) {
            (Self::Vi, Weekday::Mon) => "Thứ Hai",
            (Self::Vi, Weekday::Tue) => "Thứ Ba",
            (Self::Vi, Weekday::Wed) => "Thứ Tư",
            (Self::Vi, Weekday::Thu) => "Thứ Năm",
            (Self::Vi, Weekday::Fri) => "Thứ Sáu",
            (Self::Vi, Weekday::Sat) => "Thứ Bảy",
            (Self::Vi, Weekday::Sun) => "Chủ Nhật",
            (Self::En, Weekday::Mon) => "Monday",
            (Self::En, Weekday::Tue) => "Tuesday",
            (Self::En, Weekday::Wed) => "Wednesday",
            (Self::En, Weekday::Thu) => "Thursday",
            (Self::En, Weekday::Fri) => "Friday",
            (Self::En, Weekday::Sat) => "Saturday",
            (Self::En, Weekday::Sun) => "Sunday",
        }
    }

    pub fn weekday_short(self, day: Weekday) -> &'static str {
        match (self, day) {
            (Self::Vi, Weekday::Mon) => "Th 2",
            (Self::Vi, Weekday::Tue) => "Th 3",
            (Self::Vi, Weekday::Wed) => "Th 4",
            (Self::Vi, Weekday::Thu) => "Th 5",
            (Self::Vi, Weekday::Fri) => "Th 6",
            (Self::Vi, Weekday::Sat) => "Th 7",
            (Self::Vi, Weekday::Sun) => "CN",
            (Self::En, Weekday::Mon) => "Mon",
            (Self::En, Weekday::Tue) => "Tue",
            (Self::En, Weekday::Wed) => "Wed",
            (Self::En, Weekday::Thu) => "Thu",
            (Self::En, Weekday::Fri) => "Fri",
            (Self::En, Weekday::Sat) => "Sat",
            (Self::En, Weekday::Sun) => "Sun",
        }
    }

    /// Short day label for a forecast entry, e.g. "Th 2, 4 thg 3" / "Mon, Mar 4".
    pub fn format_day(self, at: DateTime<FixedOffset>) -> String {
        let weekday = self.weekday_short(at.weekday());
        match self {
            Self::Vi => format!("{}, {} thg {}", weekday, at.day(), at.month()),
            Self::En => format!("{}, {} {}", weekday, EN_MONTHS_SHORT[at.month0() as usize], at.day()),
        }
    }

    /// Long date and time for the card header.
    pub fn format_datetime(self, at: DateTime<FixedOffset>) -> String {
        let weekday = self.weekday_long(at.weekday());
        match self {
            Self::Vi => format!(
                "{}, {} tháng {}, {} lúc {:02}:{:02}",
                weekday,
                at.day(),
                at.month(),
                at.year(),
                at.hour(),
                at.minute()
            ),
            Self::En => format!(
                "{}, {} {}, {} at {:02}:{:02}",
                weekday,
                EN_MONTHS_LONG[at.month0() as usize],
                at.day(),
                at.year(),
                at.hour(),
                at.minute()
            ),
        }
    }
}

const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const EN_MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `HH:MM`
pub fn format_time(at: DateTime<FixedOffset>) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}
