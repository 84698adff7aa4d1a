//! Place-name lookups.
//!
//! [`Geocoder`] is the seam between the search flow and whatever service
//! resolves names: [`NominatimClient`] talks to a Nominatim-compatible HTTP
//! API, [`MemoryGeocoder`] answers from a fixed table for tests.

pub mod error;
pub mod memory;
pub mod nominatim;
pub mod place;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use foundation::math::GeoPoint;

pub use error::*;
pub use memory::*;
pub use nominatim::*;
pub use place::*;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Forward and reverse geocoding.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text query to its best match.
    ///
    /// Fails with [`GeocodeError::NotFound`] when the service has no match.
    fn forward<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PlaceResult, GeocodeError>>;

    /// Names the region containing `point`.
    ///
    /// Open ocean and other unnamed areas yield the configured fallback label
    /// rather than an error; only transport and decoding failures fail.
    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, GeocodeError>>;
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn forward<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PlaceResult, GeocodeError>> {
        (**self).forward(query)
    }

    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, GeocodeError>> {
        (**self).reverse(point)
    }
}
