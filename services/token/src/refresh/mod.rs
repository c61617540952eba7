pub mod refresher;

pub use refresher::TokenRefresher;
