//! Selection classification, value range checks and result verification.
//!
//! Everything here is read-only. Checks run in two places:
//!
//! - **Before solving**: [`classify`] inspects which values are flagged
//!   unknown and [`validate`] adds the component count and range rules.
//! - **After solving**: [`validate_result`] confirms that the solved mixture
//!   satisfies both conservation equations within a tolerance.
//!
//! # Example
//!
//! ```
//! use blendcalc::Ingredient;
//! use blendcalc::validation::{classify, validate, SelectionState, ValidationError};
//!
//! let total = Ingredient::known(160.0, 40.0);
//! let ingredients = vec![
//!     Ingredient::known(30.0, 100.0).with_unknown_concentration(),
//!     Ingredient::known(40.0, 20.0).with_unknown_concentration(),
//!     Ingredient::known(60.0, 0.0),
//! ];
//!
//! assert_eq!(classify(&ingredients, &total), SelectionState::ExcessiveConcentrationSelections);
//! assert_eq!(
//!     validate(&ingredients, &total),
//!     Err(ValidationError::ExcessiveConcentrationSelections)
//! );
//! ```

use crate::MixtureEntity;
use nalgebra::Vector2;
use thiserror::Error;

/// Lowest valid concentration (inclusive).
pub const MIN_CONCENTRATION: f64 = 0.0;

/// Highest valid concentration (inclusive).
pub const MAX_CONCENTRATION: f64 = 100.0;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reasons a mixture cannot be solved as given.
///
/// The first three variants mirror the non-`Ok` [`SelectionState`]s; the
/// rest are value range failures found by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// More than two values flagged unknown
    #[error(
        "Too many unknown values selected. Calculation is indeterminate and impossible. Expected selections are two!"
    )]
    ExcessiveSelections,
    /// Fewer than two values flagged unknown
    #[error(
        "Only one unknown value selected. Calculation is over-determinate and incorrect. Expected selections are two!"
    )]
    InsufficientSelections,
    /// Both unknown values are concentrations
    #[error(
        "Too many unknown concentrations selected. Calculation is indeterminate and impossible. Only one concentration could be unknown!"
    )]
    ExcessiveConcentrationSelections,
    /// Mixture has fewer than two ingredients
    #[error("Minimum two ingredients are expected for meaningful calculation! Found {found}")]
    TooFewComponents { found: usize },
    /// A known ingredient quantity is not strictly positive
    #[error("Invalid ingredient quantity found at position {index}!")]
    InvalidComponentQuantity { index: usize },
    /// A known ingredient concentration is outside [0, 100]
    #[error("Invalid ingredient concentration found at position {index}!")]
    InvalidComponentConcentration { index: usize },
    /// The known total quantity is not strictly positive
    #[error("Invalid total quantity!")]
    InvalidAggregateQuantity,
    /// The known total concentration is outside [0, 100]
    #[error("Invalid total concentration!")]
    InvalidAggregateConcentration,
}

/// Classification of the unknown-value selection of a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionState {
    /// Exactly two unknowns, at most one of them a concentration
    Ok,
    /// More than two unknowns
    ExcessiveSelections,
    /// Two unknowns, both concentrations
    ExcessiveConcentrationSelections,
    /// Fewer than two unknowns
    InsufficientSelections,
}

impl SelectionState {
    /// Returns true for [`SelectionState::Ok`].
    pub fn is_ok(self) -> bool {
        self == SelectionState::Ok
    }

    /// The error reported for this state, or `None` when solvable.
    pub fn error(self) -> Option<ValidationError> {
        match self {
            SelectionState::Ok => None,
            SelectionState::ExcessiveSelections => Some(ValidationError::ExcessiveSelections),
            SelectionState::ExcessiveConcentrationSelections => {
                Some(ValidationError::ExcessiveConcentrationSelections)
            }
            SelectionState::InsufficientSelections => Some(ValidationError::InsufficientSelections),
        }
    }
}

/// Number of unknown quantity and concentration flags across a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionCount {
    /// Unknown quantity flags
    pub quantities: usize,
    /// Unknown concentration flags
    pub concentrations: usize,
}

impl SelectionCount {
    /// Counts the unknown flags of `ingredients` and `total` together.
    pub fn of<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> Self {
        let quantities = ingredients.iter().filter(|i| i.is_quantity_unknown()).count();
        let concentrations = ingredients.iter().filter(|i| i.is_concentration_unknown()).count();
        SelectionCount {
            quantities: quantities + usize::from(total.is_quantity_unknown()),
            concentrations: concentrations + usize::from(total.is_concentration_unknown()),
        }
    }

    /// Total number of selections.
    pub fn total(&self) -> usize {
        self.quantities + self.concentrations
    }
}

/// Classifies the unknown-value selection of a mixture.
///
/// Only the flags are inspected, never the values, so the result does not
/// depend on ingredient order.
pub fn classify<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> SelectionState {
    let count = SelectionCount::of(ingredients, total);

    if count.total() > 2 {
        SelectionState::ExcessiveSelections
    } else if count.total() < 2 {
        SelectionState::InsufficientSelections
    } else if count.concentrations > 1 {
        SelectionState::ExcessiveConcentrationSelections
    } else {
        SelectionState::Ok
    }
}

/// Checks the cooperative rules only: ingredient count and selection shape.
///
/// Individual value ranges are not checked. Editors use this to flag a
/// structurally unsolvable mixture separately from per-field errors. A
/// mixture with fewer than two ingredients reports
/// [`ValidationError::TooFewComponents`] whatever its selection.
pub fn validate_system<I: MixtureEntity, T: MixtureEntity>(
    ingredients: &[I],
    total: &T,
) -> ValidationResult<()> {
    check_component_count(ingredients)?;
    check_selection(ingredients, total)
}

/// Full precondition check before solving.
///
/// Rules are applied in order and the first failure is returned:
///
/// 1. Selection must classify as [`SelectionState::Ok`]
/// 2. At least two ingredients
/// 3. Every known ingredient quantity is strictly positive
/// 4. Every known ingredient concentration is within [0, 100]
/// 5. The total's known quantity, then its known concentration, are valid
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first rule that fails.
pub fn validate<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> ValidationResult<()> {
    let outcome = check_preconditions(ingredients, total);
    if let Err(err) = &outcome {
        tracing::debug!(error = %err, ingredients = ingredients.len(), "mixture rejected");
    }
    outcome
}

fn check_preconditions<I: MixtureEntity, T: MixtureEntity>(
    ingredients: &[I],
    total: &T,
) -> ValidationResult<()> {
    check_selection(ingredients, total)?;
    check_component_count(ingredients)?;

    if let Some(index) = ingredients.iter().position(|i| !is_quantity_valid(i, false)) {
        return Err(ValidationError::InvalidComponentQuantity { index });
    }

    if let Some(index) = ingredients.iter().position(|i| !is_concentration_valid(i, false)) {
        return Err(ValidationError::InvalidComponentConcentration { index });
    }

    if !is_quantity_valid(total, false) {
        return Err(ValidationError::InvalidAggregateQuantity);
    }

    if !is_concentration_valid(total, false) {
        return Err(ValidationError::InvalidAggregateConcentration);
    }

    Ok(())
}

fn check_selection<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> ValidationResult<()> {
    match classify(ingredients, total).error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_component_count<I>(ingredients: &[I]) -> ValidationResult<()> {
    if ingredients.len() < 2 {
        return Err(ValidationError::TooFewComponents { found: ingredients.len() });
    }
    Ok(())
}

/// Quantity range check.
///
/// An unknown quantity passes unless `force_check_unknown` is set; a checked
/// quantity must be strictly positive. NaN never passes a check.
pub fn is_quantity_valid<E: MixtureEntity + ?Sized>(entity: &E, force_check_unknown: bool) -> bool {
    (!force_check_unknown && entity.is_quantity_unknown()) || entity.quantity() > 0.0
}

/// Concentration range check.
///
/// An unknown concentration passes unless `force_check_unknown` is set; a
/// checked concentration must lie in `[MIN_CONCENTRATION, MAX_CONCENTRATION]`.
pub fn is_concentration_valid<E: MixtureEntity + ?Sized>(entity: &E, force_check_unknown: bool) -> bool {
    (!force_check_unknown && entity.is_concentration_unknown())
        || (MIN_CONCENTRATION..=MAX_CONCENTRATION).contains(&entity.concentration())
}

/// Options for [`validate_result`].
///
/// The default is strict: NaN and out-of-range values fail, and both
/// balances must hold exactly.
///
/// # Examples
///
/// ```
/// use blendcalc::ResultCheck;
///
/// let strict = ResultCheck::default();
/// assert_eq!(strict.precision, 0.0);
///
/// let tolerant = ResultCheck::new().with_precision(1e-9).accepting_out_of_range();
/// assert!(tolerant.accept_out_of_range);
/// assert!(!tolerant.accept_nan);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultCheck {
    /// Do not fail on NaN values (division by zero while solving)
    pub accept_nan: bool,
    /// Do not fail on values outside their physical range
    pub accept_out_of_range: bool,
    /// Largest accepted absolute residual of each balance
    pub precision: f64,
}

impl ResultCheck {
    /// Strict check with zero tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts out-of-range values and checks only the balances.
    pub fn lenient(precision: f64) -> Self {
        ResultCheck { accept_nan: false, accept_out_of_range: true, precision }
    }

    /// Sets the balance tolerance.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Stops failing on NaN values.
    pub fn accepting_nan(mut self) -> Self {
        self.accept_nan = true;
        self
    }

    /// Stops failing on out-of-range values.
    pub fn accepting_out_of_range(mut self) -> Self {
        self.accept_out_of_range = true;
        self
    }
}

/// Residuals of the two conservation equations.
///
/// Element 0 is `sum(Qi) - Qt`, element 1 is `sum(Qi*Ci) - Qt*Ct`. A solved
/// mixture has both near zero.
pub fn conservation_residuals<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T) -> Vector2<f64> {
    let quantity: f64 = ingredients.iter().map(|i| i.quantity()).sum();
    let weighted: f64 = ingredients.iter().map(|i| i.weighted_quantity()).sum();
    Vector2::new(quantity - total.quantity(), weighted - total.weighted_quantity())
}

/// Verifies a solved mixture.
///
/// This covers the mathematical side: with
/// [`ResultCheck::accept_out_of_range`] set, negative quantities pass as long
/// as both balances hold.
///
/// Steps, each failing the check:
///
/// 1. Unless `accept_nan`, any NaN quantity or concentration
/// 2. Unless `accept_out_of_range`, any value failing its forced range check
/// 3. `|sum(Qi) - Qt| > precision`, or that delta is NaN while `accept_nan`
/// 4. `|sum(Qi*Ci) - Qt*Ct| > precision`, same NaN rule
///
/// # Examples
///
/// ```
/// use blendcalc::{Ingredient, ResultCheck};
/// use blendcalc::validation::validate_result;
///
/// let total = Ingredient::known(130.0, 3800.0 / 130.0);
/// let ingredients = vec![
///     Ingredient::known(30.0, 100.0),
///     Ingredient::known(40.0, 20.0),
///     Ingredient::known(60.0, 0.0),
/// ];
///
/// assert!(validate_result(&ingredients, &total, ResultCheck::new().with_precision(1e-9)));
/// ```
pub fn validate_result<I: MixtureEntity, T: MixtureEntity>(ingredients: &[I], total: &T, check: ResultCheck) -> bool {
    if !check.accept_nan && (has_nan(total) || ingredients.iter().any(has_nan)) {
        tracing::trace!("result rejected: NaN value");
        return false;
    }

    if !check.accept_out_of_range && !(in_range(total) && ingredients.iter().all(in_range)) {
        tracing::trace!("result rejected: value out of range");
        return false;
    }

    let deltas = conservation_residuals(ingredients, total).map(f64::abs);
    for (balance, delta) in ["quantity", "weighted"].into_iter().zip(deltas.iter().copied()) {
        if delta > check.precision || (delta.is_nan() && check.accept_nan) {
            tracing::trace!(balance, delta, precision = check.precision, "result rejected: balance");
            return false;
        }
    }

    true
}

fn has_nan<E: MixtureEntity>(entity: &E) -> bool {
    entity.quantity().is_nan() || entity.concentration().is_nan()
}

fn in_range<E: MixtureEntity>(entity: &E) -> bool {
    is_quantity_valid(entity, true) && is_concentration_valid(entity, true)
}
