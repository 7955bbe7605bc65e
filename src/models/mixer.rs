//! Owned mixture container with a validate-before-calculate type state.
//!
//! # Example
//!
//! ```
//! use blendcalc::{Ingredient, Mixture, MixtureEntity, ResultCheck};
//!
//! let mixture = Mixture::new(
//!     Ingredient::known(0.0, 45.0).with_unknown_quantity(),
//!     vec![
//!         Ingredient::known(0.0, 0.0).with_unknown_quantity(),
//!         Ingredient::known(30.0, 60.0),
//!     ],
//! );
//!
//! // Only validated mixtures can be calculated
//! // mixture.calculate();  // Does not compile
//! let mut mixture = mixture.validated().map_err(|(_, err)| err)?;
//! mixture.calculate();
//!
//! assert!(mixture.check(ResultCheck::new().with_precision(1e-9)));
//! assert!((mixture.total().quantity() - 40.0).abs() < 1e-9);
//! # Ok::<(), blendcalc::ValidationError>(())
//! ```

use crate::solvers::{self, CalculationCase};
use crate::validation::{self, ResultCheck, SelectionState, ValidationResult};
use crate::{Ingredient, MixtureEntity};
use nalgebra::Vector2;
use std::fmt;
use std::marker::PhantomData;

/// Phantom type marker for a mixture that may be edited.
#[derive(Debug, Clone, Copy)]
pub struct Unchecked;

/// Phantom type marker for a mixture that passed validation.
#[derive(Debug, Clone, Copy)]
pub struct Validated;

/// A total plus its ingredients.
///
/// Type parameter `S` tracks validation. In the [`Unchecked`] state the
/// mixture can be edited freely; [`Mixture::validated`] moves it to
/// [`Validated`], where the unknown flags are frozen and
/// [`Mixture::calculate`] is available. For plain value types such as
/// [`Ingredient`] the flags cannot change after validation, so calculation
/// never meets an unsolvable selection. An entity type whose flags use
/// interior mutability (a `Cell<bool>`, say) can still change them through
/// `&self` and reach the panic in [`solvers::calculate`].
#[derive(Debug, Clone)]
pub struct Mixture<I = Ingredient, S = Unchecked> {
    total: I,
    ingredients: Vec<I>,
    _state: PhantomData<S>,
}

impl<I: MixtureEntity> Mixture<I, Unchecked> {
    /// Creates an editable mixture.
    ///
    /// # Arguments
    ///
    /// * `total` - The aggregate entity
    /// * `ingredients` - Ingredients in order; order only breaks ties when two
    ///   ingredient quantities are unknown
    pub fn new(total: I, ingredients: Vec<I>) -> Self {
        Mixture { total, ingredients, _state: PhantomData }
    }

    /// Mutable access to the ingredients.
    pub fn ingredients_mut(&mut self) -> &mut [I] {
        &mut self.ingredients
    }

    /// Mutable access to the total.
    pub fn total_mut(&mut self) -> &mut I {
        &mut self.total
    }

    /// Appends an ingredient.
    pub fn push_ingredient(&mut self, ingredient: I) {
        self.ingredients.push(ingredient);
    }

    /// Removes the ingredient at `index`.
    ///
    /// Returns `None` when the index is out of range or when removing would
    /// leave fewer than two ingredients.
    pub fn remove_ingredient(&mut self, index: usize) -> Option<I> {
        if self.ingredients.len() <= 2 || index >= self.ingredients.len() {
            return None;
        }
        Some(self.ingredients.remove(index))
    }

    /// Runs full validation, transitioning to the [`Validated`] state.
    ///
    /// # Errors
    ///
    /// On failure the unchanged mixture is handed back with the first
    /// [`ValidationError`](crate::ValidationError).
    #[allow(clippy::result_large_err)]
    pub fn validated(self) -> Result<Mixture<I, Validated>, (Self, validation::ValidationError)> {
        match validation::validate(&self.ingredients, &self.total) {
            Ok(()) => Ok(Mixture { total: self.total, ingredients: self.ingredients, _state: PhantomData }),
            Err(err) => Err((self, err)),
        }
    }
}

impl Mixture<Ingredient, Unchecked> {
    /// Dilution problem: how much water brings a spirit to a target strength.
    ///
    /// The water quantity and the total quantity are unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use blendcalc::{Mixture, MixtureEntity};
    ///
    /// let mut mixture = Mixture::dilution(30.0, 60.0, 45.0).validated().map_err(|(_, e)| e)?;
    /// mixture.calculate();
    /// assert!((mixture.ingredients()[0].quantity() - 10.0).abs() < 1e-9);
    /// # Ok::<(), blendcalc::ValidationError>(())
    /// ```
    pub fn dilution(spirit_quantity: f64, spirit_concentration: f64, target_concentration: f64) -> Self {
        Mixture::new(
            Ingredient::known(0.0, target_concentration).with_description("Total").with_unknown_quantity(),
            vec![
                Ingredient::known(0.0, 0.0).with_description("Water").with_unknown_quantity(),
                Ingredient::known(spirit_quantity, spirit_concentration).with_description("Strong alcohol"),
            ],
        )
    }
}

impl<I: MixtureEntity> Mixture<I, Validated> {
    /// Clears the unknown fields and solves them.
    pub fn calculate(&mut self) -> CalculationCase {
        solvers::clear_unknowns(&mut self.ingredients, &mut self.total);
        solvers::calculate(&mut self.ingredients, &mut self.total)
    }

    /// Returns to the editable state.
    pub fn into_unchecked(self) -> Mixture<I, Unchecked> {
        Mixture { total: self.total, ingredients: self.ingredients, _state: PhantomData }
    }
}

// Methods available in any state
impl<I: MixtureEntity, S> Mixture<I, S> {
    /// The total.
    pub fn total(&self) -> &I {
        &self.total
    }

    /// The ingredients in order.
    pub fn ingredients(&self) -> &[I] {
        &self.ingredients
    }

    /// Number of ingredients (the total is not counted).
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns whether there are no ingredients.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Classifies the unknown-value selection.
    pub fn selection(&self) -> SelectionState {
        validation::classify(&self.ingredients, &self.total)
    }

    /// Selection shape and ingredient count only, see [`validation::validate_system`].
    pub fn validate_system(&self) -> ValidationResult<()> {
        validation::validate_system(&self.ingredients, &self.total)
    }

    /// Full precondition check, see [`validation::validate`].
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate(&self.ingredients, &self.total)
    }

    /// Residuals of the quantity and weighted balances.
    pub fn residuals(&self) -> Vector2<f64> {
        validation::conservation_residuals(&self.ingredients, &self.total)
    }

    /// Verifies the current values, see [`validation::validate_result`].
    pub fn check(&self, check: ResultCheck) -> bool {
        validation::validate_result(&self.ingredients, &self.total, check)
    }

    /// Splits into the total and the ingredients.
    pub fn into_parts(self) -> (I, Vec<I>) {
        (self.total, self.ingredients)
    }
}

impl<I: fmt::Display, S> fmt::Display for Mixture<I, S> {
    /// Total first, then one ingredient per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.total)?;
        for ingredient in &self.ingredients {
            write!(f, "\n{}", ingredient)?;
        }
        Ok(())
    }
}
