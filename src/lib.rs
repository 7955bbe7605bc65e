//! # blendcalc: Typed Mixture Equation Solving
//!
//! Solves the two conservation equations of a simple mixture for any two
//! unknown values. A mixture is a set of ingredients plus one total, each
//! carrying a quantity and a concentration:
//!
//! ```text
//! Q1 + Q2 + ... + Qn          = Qt
//! Q1*C1 + Q2*C2 + ... + Qn*Cn = Qt*Ct
//! ```
//!
//! Any quantity or concentration can be flagged as unknown. A system is
//! solvable when exactly two values are unknown and at most one of them is a
//! concentration.
//!
//! ## Example
//!
//! ```
//! use blendcalc::{Ingredient, MixtureEntity, solvers, validation};
//!
//! // How much water brings 30 units of 60% spirit down to 45%?
//! let mut total = Ingredient::known(0.0, 45.0).with_unknown_quantity();
//! let mut ingredients = vec![
//!     Ingredient::known(0.0, 0.0).with_unknown_quantity(),
//!     Ingredient::known(30.0, 60.0),
//! ];
//!
//! validation::validate(&ingredients, &total)?;
//! solvers::calculate(&mut ingredients, &mut total);
//!
//! assert!((total.quantity() - 40.0).abs() < 1e-9);
//! assert!((ingredients[0].quantity() - 10.0).abs() < 1e-9);
//! # Ok::<(), blendcalc::ValidationError>(())
//! ```
//!
//! Calling [`solvers::calculate`] on a selection that does not classify as
//! [`SelectionState::Ok`] is a programming error and panics. Use
//! [`solvers::solve`] or the [`models::Mixture`] container to get the
//! validation step for free.
//!
//! ## Layout
//!
//! - [`validation`]: selection classification, value range checks, result checks
//! - [`solvers`]: calculation case detection and the two closed-form cases
//! - [`models`]: owned `Mixture` container with type-state checked solving

use std::fmt;

pub mod models;
pub mod solvers;
pub mod validation;

pub use models::Mixture;
pub use solvers::{CalculationCase, calculate, solve};
pub use validation::{
    MAX_CONCENTRATION, MIN_CONCENTRATION, ResultCheck, SelectionState, ValidationError,
    ValidationResult,
};

/// Read/write view of one member of a mixture: an ingredient or the total.
///
/// The engine reads the unknown flags and known values through this trait and
/// writes only the fields flagged unknown. Implement it for your own types to
/// solve them in place without copying into [`Ingredient`].
///
/// # Examples
///
/// ```
/// use blendcalc::MixtureEntity;
///
/// struct Row {
///     volume: f64,
///     abv: f64,
///     solve_volume: bool,
/// }
///
/// impl MixtureEntity for Row {
///     fn quantity(&self) -> f64 { self.volume }
///     fn set_quantity(&mut self, value: f64) { self.volume = value; }
///     fn is_quantity_unknown(&self) -> bool { self.solve_volume }
///     fn concentration(&self) -> f64 { self.abv }
///     fn set_concentration(&mut self, value: f64) { self.abv = value; }
///     fn is_concentration_unknown(&self) -> bool { false }
/// }
///
/// let row = Row { volume: 2.0, abv: 40.0, solve_volume: false };
/// assert_eq!(row.weighted_quantity(), 80.0);
/// ```
pub trait MixtureEntity {
    /// Amount of this entity, in any unit shared by the whole mixture.
    fn quantity(&self) -> f64;

    /// Overwrites the quantity.
    fn set_quantity(&mut self, value: f64);

    /// True if the quantity is to be solved for.
    fn is_quantity_unknown(&self) -> bool;

    /// Percentage-like concentration, meaningful in `[0, 100]`.
    fn concentration(&self) -> f64;

    /// Overwrites the concentration.
    fn set_concentration(&mut self, value: f64);

    /// True if the concentration is to be solved for.
    fn is_concentration_unknown(&self) -> bool;

    /// Quantity times concentration: this entity's term in the weighted balance.
    fn weighted_quantity(&self) -> f64 {
        self.quantity() * self.concentration()
    }
}

/// One ingredient of a mixture, or the mixture total.
///
/// Plain value type implementing [`MixtureEntity`]. The description is a
/// label for display only and never read by the engine.
///
/// # Examples
///
/// ```
/// use blendcalc::Ingredient;
///
/// let vodka = Ingredient::known(50.0, 40.0).with_description("Vodka");
/// let water = Ingredient::known(0.0, 0.0)
///     .with_description("Water")
///     .with_unknown_quantity();
///
/// assert_eq!(vodka.to_string(), "Vodka -> Quantity:50   Concentration:40");
/// assert_eq!(water.to_string(), "Water -> Quantity*:0   Concentration:0");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ingredient {
    /// Free-form label
    pub description: String,
    /// Amount [any unit consistent across the mixture]
    pub quantity: f64,
    /// Quantity is to be solved for
    pub quantity_unknown: bool,
    /// Concentration [0, 100]
    pub concentration: f64,
    /// Concentration is to be solved for
    pub concentration_unknown: bool,
}

impl Ingredient {
    /// Creates an ingredient with every field given explicitly.
    ///
    /// # Arguments
    ///
    /// * `description` - Display label
    /// * `quantity` - Amount (ignored by validation when unknown)
    /// * `concentration` - Concentration (ignored by validation when unknown)
    /// * `quantity_unknown` - Solve for the quantity
    /// * `concentration_unknown` - Solve for the concentration
    pub fn new(
        description: impl Into<String>,
        quantity: f64,
        concentration: f64,
        quantity_unknown: bool,
        concentration_unknown: bool,
    ) -> Self {
        Ingredient {
            description: description.into(),
            quantity,
            quantity_unknown,
            concentration,
            concentration_unknown,
        }
    }

    /// Creates an unlabelled ingredient with both values known.
    pub fn known(quantity: f64, concentration: f64) -> Self {
        Self::new(String::new(), quantity, concentration, false, false)
    }

    /// Creates an unlabelled ingredient with both values unknown.
    ///
    /// Both fields start as NaN so a skipped calculation is visible.
    pub fn unknown() -> Self {
        Self::new(String::new(), f64::NAN, f64::NAN, true, true)
    }

    /// Sets the display label.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Flags the quantity as unknown.
    pub fn with_unknown_quantity(mut self) -> Self {
        self.quantity_unknown = true;
        self
    }

    /// Flags the concentration as unknown.
    pub fn with_unknown_concentration(mut self) -> Self {
        self.concentration_unknown = true;
        self
    }

    /// Number of unknown fields on this ingredient (0, 1 or 2).
    pub fn unknown_count(&self) -> usize {
        usize::from(self.quantity_unknown) + usize::from(self.concentration_unknown)
    }
}

impl MixtureEntity for Ingredient {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn set_quantity(&mut self, value: f64) {
        self.quantity = value;
    }

    fn is_quantity_unknown(&self) -> bool {
        self.quantity_unknown
    }

    fn concentration(&self) -> f64 {
        self.concentration
    }

    fn set_concentration(&mut self, value: f64) {
        self.concentration = value;
    }

    fn is_concentration_unknown(&self) -> bool {
        self.concentration_unknown
    }
}

impl fmt::Display for Ingredient {
    /// Unknown fields are marked with `*`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qu = if self.quantity_unknown { "*" } else { "" };
        let cu = if self.concentration_unknown { "*" } else { "" };
        write!(
            f,
            "{} -> Quantity{}:{}   Concentration{}:{}",
            self.description, qu, self.quantity, cu, self.concentration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ingredient() {
        let ingredient = Ingredient::known(30.0, 100.0);
        assert_eq!(ingredient.quantity(), 30.0);
        assert_eq!(ingredient.concentration(), 100.0);
        assert!(!ingredient.is_quantity_unknown());
        assert!(!ingredient.is_concentration_unknown());
        assert_eq!(ingredient.unknown_count(), 0);
    }

    #[test]
    fn test_unknown_ingredient_starts_as_nan() {
        let ingredient = Ingredient::unknown();
        assert!(ingredient.quantity().is_nan());
        assert!(ingredient.concentration().is_nan());
        assert_eq!(ingredient.unknown_count(), 2);
    }

    #[test]
    fn test_builder_flags() {
        let ingredient = Ingredient::known(1.0, 2.0)
            .with_unknown_concentration()
            .with_description("Syrup");
        assert!(!ingredient.quantity_unknown);
        assert!(ingredient.concentration_unknown);
        assert_eq!(ingredient.description, "Syrup");
    }

    #[test]
    fn test_setters_write_through_trait() {
        let mut ingredient = Ingredient::default();
        ingredient.set_quantity(12.5);
        ingredient.set_concentration(8.0);
        assert_eq!(ingredient.quantity, 12.5);
        assert_eq!(ingredient.concentration, 8.0);
        assert_eq!(ingredient.weighted_quantity(), 100.0);
    }

    #[test]
    fn test_display_marks_unknowns() {
        let total = Ingredient::new("Total", 150.0, 40.0, true, true);
        assert_eq!(total.to_string(), "Total -> Quantity*:150   Concentration*:40");

        let plain = Ingredient::known(60.0, 0.0);
        assert_eq!(plain.to_string(), " -> Quantity:60   Concentration:0");
    }
}
