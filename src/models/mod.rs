//! Data models

pub mod content;
pub mod fuel_request;
pub mod message;
pub mod session;
pub mod stats;
pub mod user;
pub mod waste_entry;

pub use content::{ContentPost, CreateContentInput, UpdateContentInput};
pub use fuel_request::{
    CreateFuelRequestInput, FuelRequest, FuelRequestStatus, FuelType, RequestPriority,
    UpdateFuelRequestInput,
};
pub use message::{Contact, Message, MAX_MESSAGE_LENGTH};
pub use session::Session;
pub use stats::{AdminStats, DashboardStats, ProducerStats, SchoolStats, SupplierStats};
pub use user::{UpdateProfileInput, User, UserRole, UserStatus};
pub use waste_entry::{
    CreateWasteEntryInput, QuantityUnit, UpdateWasteEntryInput, WasteEntry, WasteStatus,
    WasteType,
};
