//! Closed-form solvers for the two mixture conservation equations.
//!
//! A mixture always yields exactly two linear equations:
//!
//! ```text
//! sum(Qi)    = Qt        (quantity balance)
//! sum(Qi*Ci) = Qt*Ct     (weighted balance)
//! ```
//!
//! With two unknowns there are only two shapes that can be solved, each with
//! its own module:
//!
//! - [`two_quantities`]: two unknown quantities, all concentrations known
//! - [`quantity_concentration`]: one unknown quantity and one unknown
//!   concentration, on the same entity or on different ones
//!
//! Two unknown concentrations are never solvable: only the weighted balance
//! contains concentrations, and one equation cannot separate two unknowns.
//!
//! # Degenerate Input
//!
//! Division by zero is not trapped. When the known concentrations make the
//! system singular the solved values come out NaN or infinite, and the caller
//! detects this with [`validate_result`](crate::validation::validate_result).
//!
//! # Example
//!
//! ```
//! use blendcalc::{CalculationCase, Ingredient, MixtureEntity};
//! use blendcalc::solvers::solve;
//!
//! let mut total = Ingredient::unknown();
//! let mut ingredients = vec![
//!     Ingredient::known(30.0, 100.0),
//!     Ingredient::known(40.0, 20.0),
//!     Ingredient::known(60.0, 0.0),
//! ];
//!
//! let case = solve(&mut ingredients, &mut total)?;
//!
//! assert_eq!(case, CalculationCase::OneQuantityOneConcentration);
//! assert_eq!(total.quantity(), 130.0);
//! assert!((total.concentration() - 3800.0 / 130.0).abs() < 1e-12);
//! # Ok::<(), blendcalc::ValidationError>(())
//! ```

pub mod quantity_concentration;
pub mod two_quantities;

use crate::MixtureEntity;
use crate::validation::{self, SelectionCount, ValidationResult};
use std::fmt;

/// The algebraic configuration a valid selection falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculationCase {
    /// Two unknown quantities, no unknown concentration
    TwoQuantities,
    /// One unknown quantity and one unknown concentration
    OneQuantityOneConcentration,
}

impl CalculationCase {
    /// Determines the case from the unknown flags.
    ///
    /// Returns `None` for any selection that [`validation::classify`] would
    /// not accept.
    pub fn detect<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> Option<Self> {
        Self::from_count(SelectionCount::of(ingredients, total))
    }

    /// Maps a selection count to its case.
    pub fn from_count(count: SelectionCount) -> Option<Self> {
        match (count.quantities, count.concentrations) {
            (2, 0) => Some(CalculationCase::TwoQuantities),
            (1, 1) => Some(CalculationCase::OneQuantityOneConcentration),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationCase::TwoQuantities => write!(f, "two quantities"),
            CalculationCase::OneQuantityOneConcentration => write!(f, "one quantity, one concentration"),
        }
    }
}

/// Solves the unknown values in place.
///
/// Only fields flagged unknown are written. Entities are never added,
/// removed or reordered, and flags are never changed.
///
/// # Panics
///
/// Panics if the selection is not one of the two solvable shapes. Callers
/// must have checked the selection with [`validation::classify`] or
/// [`validation::validate`] first; [`solve`] does both steps.
///
/// # Examples
///
/// ```
/// use blendcalc::{Ingredient, MixtureEntity};
/// use blendcalc::solvers::calculate;
///
/// let mut total = Ingredient::known(150.0, 40.0);
/// let mut ingredients = vec![
///     Ingredient::known(0.0, 100.0).with_unknown_quantity(),
///     Ingredient::known(0.0, 20.0).with_unknown_quantity(),
///     Ingredient::known(60.0, 0.0),
/// ];
///
/// calculate(&mut ingredients, &mut total);
///
/// assert!((ingredients[0].quantity() - 52.5).abs() < 1e-9);
/// assert!((ingredients[1].quantity() - 37.5).abs() < 1e-9);
/// ```
pub fn calculate<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) -> CalculationCase {
    let count = SelectionCount::of(ingredients, total);
    let Some(case) = CalculationCase::from_count(count) else {
        panic!(
            "Invalid calculation case: unknown quantities {}; unknown concentrations {}",
            count.quantities, count.concentrations
        );
    };

    match case {
        CalculationCase::TwoQuantities => two_quantities::solve(ingredients, total),
        CalculationCase::OneQuantityOneConcentration => quantity_concentration::solve(ingredients, total),
    }

    tracing::debug!(
        case = %case,
        total_quantity = total.quantity(),
        total_concentration = total.concentration(),
        "mixture calculated"
    );

    if !solved_values_finite(ingredients, total) {
        tracing::warn!(case = %case, "calculation produced a non-finite value");
    }

    case
}

/// Validates, clears the unknown fields, then calculates.
///
/// Never panics: an unsolvable selection is reported as a
/// [`ValidationError`](crate::ValidationError) and nothing is written.
///
/// # Errors
///
/// Returns the first failed precondition from [`validation::validate`].
pub fn solve<I: MixtureEntity, T: MixtureEntity>(
    ingredients: &mut [I],
    total: &mut T,
) -> ValidationResult<CalculationCase> {
    validation::validate(ingredients, total)?;
    clear_unknowns(ingredients, total);
    Ok(calculate(ingredients, total))
}

/// Sets every unknown-flagged field to NaN.
///
/// Run before a calculation so a stale value is never mistaken for a result.
pub fn clear_unknowns<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) {
    for ingredient in ingredients.iter_mut() {
        clear_entity(ingredient);
    }
    clear_entity(total);
}

fn clear_entity<E: MixtureEntity>(entity: &mut E) {
    if entity.is_quantity_unknown() {
        entity.set_quantity(f64::NAN);
    }
    if entity.is_concentration_unknown() {
        entity.set_concentration(f64::NAN);
    }
}

// Only unknown fields are inspected; known inputs are the caller's business.
fn solved_values_finite<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> bool {
    fn finite<E: MixtureEntity>(entity: &E) -> bool {
        (!entity.is_quantity_unknown() || entity.quantity().is_finite())
            && (!entity.is_concentration_unknown() || entity.concentration().is_finite())
    }
    finite(total) && ingredients.iter().all(finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ingredient, ValidationError};
    use tracing_test::traced_test;

    fn three_known() -> Vec<Ingredient> {
        vec![Ingredient::known(30.0, 100.0), Ingredient::known(40.0, 20.0), Ingredient::known(60.0, 0.0)]
    }

    #[test]
    fn test_detect_cases() {
        let total = Ingredient::unknown();
        assert_eq!(
            CalculationCase::detect(&three_known(), &total),
            Some(CalculationCase::OneQuantityOneConcentration)
        );

        let mut ingredients = three_known();
        ingredients[0].quantity_unknown = true;
        let total = Ingredient::known(0.0, 40.0).with_unknown_quantity();
        assert_eq!(CalculationCase::detect(&ingredients, &total), Some(CalculationCase::TwoQuantities));

        let total = Ingredient::known(150.0, 40.0);
        assert_eq!(CalculationCase::detect(&three_known(), &total), None);
    }

    #[test]
    fn test_from_count_rejects_two_concentrations() {
        let count = SelectionCount { quantities: 0, concentrations: 2 };
        assert_eq!(CalculationCase::from_count(count), None);
    }

    #[test]
    #[should_panic(expected = "Invalid calculation case")]
    fn test_calculate_panics_on_contract_violation() {
        let mut total = Ingredient::known(150.0, 40.0);
        let mut ingredients = three_known();
        calculate(&mut ingredients, &mut total);
    }

    #[test]
    fn test_solve_rejects_without_writing() {
        let mut total = Ingredient::known(150.0, 40.0).with_unknown_quantity();
        let mut ingredients = three_known();

        assert_eq!(solve(&mut ingredients, &mut total), Err(ValidationError::InsufficientSelections));
        assert_eq!(total.quantity, 150.0);
    }

    #[test]
    fn test_clear_unknowns() {
        let mut total = Ingredient::known(150.0, 40.0).with_unknown_concentration();
        let mut ingredients = three_known();
        ingredients[1].quantity_unknown = true;

        clear_unknowns(&mut ingredients, &mut total);

        assert!(total.concentration.is_nan());
        assert_eq!(total.quantity, 150.0);
        assert!(ingredients[1].quantity.is_nan());
        assert_eq!(ingredients[1].concentration, 20.0);
        assert_eq!(ingredients[0].quantity, 30.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(CalculationCase::TwoQuantities.to_string(), "two quantities");
    }

    #[test]
    #[traced_test]
    fn test_degenerate_result_is_logged() {
        // Unknown ingredient has the same concentration as the total
        let mut total = Ingredient::known(0.0, 40.0).with_unknown_quantity();
        let mut ingredients = vec![
            Ingredient::known(30.0, 40.0),
            Ingredient::known(0.0, 40.0).with_unknown_quantity(),
        ];

        calculate(&mut ingredients, &mut total);

        assert!(total.quantity.is_nan());
        assert!(logs_contain("non-finite"));
    }
}
