//! `gridscale` applies a uniform surveying scale-factor correction to
//! GeoJSON feature collections: every vertex is scaled about the
//! collection's centroid by a single factor, so surface distances can be
//! reconciled with grid distances without translating the drawing.
//!
//! The transform is pure and synchronous: no I/O, no shared mutable state.
//! It is safe to call concurrently from any number of call sites; every
//! invocation allocates fresh output and never mutates its input.

pub mod error;
pub mod geojson;
pub mod transform;

#[doc(inline)]
pub use error::{IndexPath, Result, ScaleError};
#[doc(inline)]
pub use transform::{Point, SUPPORTED_FACTOR_RANGE, apply_scale_factor};
