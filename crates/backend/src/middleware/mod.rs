//! Request middleware: sessions, auth resolution, rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{AuthRejection, SellerShopAuth, SellerShopContext, ShopAuth};
pub use rate_limit::probe_rate_limiter;
pub use session::create_session_layer;
