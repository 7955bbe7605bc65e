//! Mixture models built on the validation and solver layers.
//!
//! - **Mixture**: an owned total plus ingredients, with a type state that
//!   only allows calculation after validation passed
//!
//! The free functions in [`crate::validation`] and [`crate::solvers`] work on
//! borrowed slices of any [`MixtureEntity`](crate::MixtureEntity) and are the
//! right choice when the entities live in caller-owned collections. Use
//! [`Mixture`] when the mixture can be owned as a unit.
//!
//! ## Example
//!
//! ```
//! use blendcalc::models::{Mixture, Unchecked};
//! use blendcalc::{Ingredient, ValidationError};
//!
//! let mixture: Mixture<Ingredient, Unchecked> = Mixture::new(
//!     Ingredient::known(100.0, 40.0),
//!     vec![Ingredient::known(50.0, 40.0), Ingredient::known(50.0, 40.0)],
//! );
//!
//! // Nothing is unknown, so there is nothing to solve
//! let (_mixture, err) = mixture.validated().unwrap_err();
//! assert_eq!(err, ValidationError::InsufficientSelections);
//! ```

pub mod mixer;

pub use mixer::{Mixture, Unchecked, Validated};
