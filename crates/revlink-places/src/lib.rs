//! Resolution of arbitrary Google Maps links to a canonical place identity.
//!
//! The pipeline is split into independently testable stages:
//!
//! - [`RedirectResolver`] follows HTTP redirects and HTML interstitials from a
//!   possibly-shortened link to a canonical Maps URL.
//! - [`extract`] holds pure string-pattern functions that pull a place
//!   identifier, a name or query, and coordinates out of a URL.
//! - [`PlacesClient`] queries the place-data provider when the URL alone is
//!   not enough.
//! - [`PlaceResolver`] composes the three in a fixed fallback order.

pub mod error;
pub mod extract;
pub mod lookup;
pub mod redirect;
pub mod resolver;
pub mod types;

pub use error::PlacesError;
pub use extract::{extract_coordinates, extract_name_or_query, extract_place_identifier};
pub use lookup::PlacesClient;
pub use redirect::RedirectResolver;
pub use resolver::PlaceResolver;
pub use types::{Coordinates, ResolvedPlace};
