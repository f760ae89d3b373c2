// Services - business operations composed from entity repositories

pub mod career_forecast_service;
pub mod content_service;
pub mod record_service;

pub use career_forecast_service::CareerForecastService;
pub use content_service::ContentService;
pub use record_service::RecordService;
