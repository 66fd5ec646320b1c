//! Postcode resolution.
//!
//! A [`PostcodeResolver`] turns raw postcode cells into coordinates by
//! consulting a session cache, the postcode library, the missing cache
//! and finally a geocoder. Every collaborator is injected, so tests can
//! run the full pipeline against fixed data and a deterministic
//! selection strategy.

mod postcode_resolver;
mod selection;
mod session;

pub use postcode_resolver::{PostcodeResolver, Resolution, ResolutionSource};
pub use selection::{FirstCandidate, RandomCandidate, SelectionMode, SelectionStrategy};
pub use session::SessionCache;
