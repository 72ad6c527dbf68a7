pub mod oauth_callback;

pub use oauth_callback::oauth_callback;
