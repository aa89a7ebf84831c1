//! Records mirrored from backend JSON.
//!
//! The backend owns every one of these; the frontend only reads them and
//! posts the `*Input` shapes back. Wire field names are camelCase.

pub mod address;
pub mod catalog;
pub mod dashboard;
pub mod favorite;
pub mod order;
pub mod review;
pub mod user;

pub use address::{Address, AddressInput};
pub use catalog::{Category, CategoryInput, Page, Product, ProductInput, ProductQuery};
pub use dashboard::{DashboardStats, RevenuePoint};
pub use favorite::Favorite;
pub use order::{Order, OrderDetail, OrderLine, PlaceOrder};
pub use review::{NewReview, Review, average_rating};
pub use user::{AuthSession, LoginRequest, RegisterRequest, User};
