//! Business logic services
//!
//! Services own authorization and validation; repositories below them are
//! pure data access. Handlers above them only translate HTTP.

pub mod content;
pub mod dashboard;
pub mod fuel;
pub mod google;
pub mod message;
pub mod password;
pub mod rate_limiter;
pub mod user;
pub mod validation;
pub mod waste;

pub use content::{ContentService, ContentServiceError};
pub use dashboard::{DashboardService, DashboardServiceError};
pub use fuel::{FuelService, FuelServiceError};
pub use google::{GoogleTokenVerifier, GoogleVerifyError, HttpGoogleVerifier};
pub use message::{MessageService, MessageServiceError};
pub use rate_limiter::LoginRateLimiter;
pub use user::{LoginInput, RegisterInput, UserService, UserServiceError};
pub use waste::{WasteService, WasteServiceError};
