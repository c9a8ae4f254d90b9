//! Google Cloud Translation v2 backend.
//!
//! Provides:
//! - `GoogleTranslator` - `Translator` over the v2 REST API
//! - `Credentials` and access token caching

pub mod credentials;
pub mod google;
pub mod protocol;

pub use credentials::{Credentials, TokenCache};
pub use google::{DEFAULT_BASE_URL, GoogleTranslator, GoogleTranslatorBuilder};
