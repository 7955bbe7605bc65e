//! Two unknown quantities, every concentration known.
//!
//! With `Qsum` the sum of the known ingredient quantities and `Psum` the sum
//! of their weighted quantities, two placements are possible:
//!
//! **Total and one ingredient `x` unknown.** Substituting `Qx = Qt - Qsum`
//! into the weighted balance gives
//!
//! ```text
//! Qt = (Psum - Qsum*Cx) / (Ct - Cx)
//! Qx = Qt - Qsum
//! ```
//!
//! **Two ingredients `x` and `y` unknown.** Eliminating `Qx` gives
//!
//! ```text
//! Qy = (Psum + Cx*Qt - Cx*Qsum - Ct*Qt) / (Cx - Cy)
//! Qx = Qt - Qsum - Qy
//! ```
//!
//! `x` is the first unknown ingredient in slice order and `y` the next one;
//! both are solved together, so the labelling does not change the result.
//! Equal concentrations in either denominator give a NaN or infinite result.

use crate::MixtureEntity;

/// Sums of the ingredients whose quantity is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownSums {
    /// Sum of known quantities
    pub quantity: f64,
    /// Sum of known quantity * concentration
    pub weighted: f64,
}

impl KnownSums {
    /// Sums over every ingredient with a known quantity.
    pub fn of<I: MixtureEntity>(ingredients: &[I]) -> Self {
        ingredients.iter().filter(|i| !i.is_quantity_unknown()).fold(
            KnownSums { quantity: 0.0, weighted: 0.0 },
            |acc, i| KnownSums {
                quantity: acc.quantity + i.quantity(),
                weighted: acc.weighted + i.weighted_quantity(),
            },
        )
    }
}

/// Solves the total quantity and one ingredient quantity.
///
/// Returns `(Qt, Qx)`.
pub fn total_and_ingredient(sums: KnownSums, cx: f64, ct: f64) -> (f64, f64) {
    let qt = (sums.weighted - sums.quantity * cx) / (ct - cx);
    (qt, qt - sums.quantity)
}

/// Solves two ingredient quantities against a known total.
///
/// Returns `(Qx, Qy)`.
pub fn two_ingredients(sums: KnownSums, cx: f64, cy: f64, qt: f64, ct: f64) -> (f64, f64) {
    let qy = (sums.weighted + cx * qt - cx * sums.quantity - ct * qt) / (cx - cy);
    (qt - sums.quantity - qy, qy)
}

/// Writes both unknown quantities.
///
/// The caller guarantees exactly two unknown quantities and no unknown
/// concentration across `ingredients` and `total`.
pub(crate) fn solve<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) {
    let sums = KnownSums::of(ingredients);
    let mut unknown = ingredients.iter().enumerate().filter(|(_, i)| i.is_quantity_unknown()).map(|(idx, _)| idx);
    let x = unknown.next();
    let y = unknown.next();

    match (total.is_quantity_unknown(), x, y) {
        (true, Some(x), None) => {
            let (qt, qx) = total_and_ingredient(sums, ingredients[x].concentration(), total.concentration());
            total.set_quantity(qt);
            ingredients[x].set_quantity(qx);
        }
        (false, Some(x), Some(y)) => {
            let (qx, qy) = two_ingredients(
                sums,
                ingredients[x].concentration(),
                ingredients[y].concentration(),
                total.quantity(),
                total.concentration(),
            );
            ingredients[y].set_quantity(qy);
            ingredients[x].set_quantity(qx);
        }
        (total_unknown, x, y) => unreachable!(
            "two-quantity case with total unknown = {total_unknown}, ingredients {x:?} and {y:?}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ingredient;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_sums_skip_unknown_quantities() {
        let ingredients = vec![
            Ingredient::known(30.0, 100.0),
            Ingredient::known(999.0, 20.0).with_unknown_quantity(),
            Ingredient::known(60.0, 0.0),
        ];
        let sums = KnownSums::of(&ingredients);
        assert_eq!(sums.quantity, 90.0);
        assert_eq!(sums.weighted, 3000.0);
    }

    #[test]
    fn test_total_and_ingredient() {
        // [(30,100), (40,20), (?,0)] -> (?, 40)
        let ingredients = vec![
            Ingredient::known(30.0, 100.0),
            Ingredient::known(40.0, 20.0),
            Ingredient::known(f64::NAN, 0.0).with_unknown_quantity(),
        ];
        let mut total = Ingredient::known(f64::NAN, 40.0).with_unknown_quantity();
        let mut ingredients = ingredients;

        solve(&mut ingredients, &mut total);

        assert_relative_eq!(total.quantity, 95.0, epsilon = 1e-9);
        assert_relative_eq!(ingredients[2].quantity, 25.0, epsilon = 1e-9);
        assert_eq!(ingredients[0].quantity, 30.0);
    }

    #[test]
    fn test_two_ingredients() {
        // [(30,100), (?,20), (?,0)] -> (90, 40)
        let mut ingredients = vec![
            Ingredient::known(30.0, 100.0),
            Ingredient::known(f64::NAN, 20.0).with_unknown_quantity(),
            Ingredient::known(f64::NAN, 0.0).with_unknown_quantity(),
        ];
        let mut total = Ingredient::known(90.0, 40.0);

        solve(&mut ingredients, &mut total);

        assert_relative_eq!(ingredients[1].quantity, 30.0, epsilon = 1e-9);
        assert_relative_eq!(ingredients[2].quantity, 30.0, epsilon = 1e-9);
        assert_eq!(total.quantity, 90.0);
    }

    #[test]
    fn test_labelling_does_not_change_result() {
        let sums = KnownSums { quantity: 60.0, weighted: 0.0 };
        let (qx, qy) = two_ingredients(sums, 100.0, 20.0, 150.0, 40.0);
        let (qy2, qx2) = two_ingredients(sums, 20.0, 100.0, 150.0, 40.0);
        assert_relative_eq!(qx, qx2, epsilon = 1e-9);
        assert_relative_eq!(qy, qy2, epsilon = 1e-9);
    }

    #[test]
    fn test_equal_concentrations_are_singular() {
        let sums = KnownSums { quantity: 30.0, weighted: 1200.0 };
        let (qt, qx) = total_and_ingredient(sums, 40.0, 40.0);
        assert!(qt.is_nan());
        assert!(qx.is_nan());

        let (qx, qy) = two_ingredients(KnownSums { quantity: 0.0, weighted: 0.0 }, 50.0, 50.0, 10.0, 30.0);
        assert!(!qx.is_finite());
        assert!(!qy.is_finite());
    }
}
