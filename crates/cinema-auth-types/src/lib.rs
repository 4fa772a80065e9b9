//! Auth types shared across Cinema services.
//!
//! Provides the `IdentityHeaders` extractor for gateway-injected identity.

pub mod identity;
