//! Install-referrer providers.

mod static_provider;

pub use static_provider::StaticReferrerProvider;
