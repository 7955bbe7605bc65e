//! One unknown quantity and one unknown concentration.
//!
//! The two unknowns may sit on the same entity or on different ones. The
//! quantity balance has a single unknown, so it is solved first; after that
//! every quantity is known and the weighted balance has a single unknown too.

use crate::MixtureEntity;

/// Writes the unknown quantity, then the unknown concentration.
///
/// The caller guarantees exactly one unknown quantity and one unknown
/// concentration across `ingredients` and `total`.
pub(crate) fn solve<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) {
    solve_quantity(ingredients, total);
    solve_concentration(ingredients, total);
}

fn solve_quantity<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) {
    let known: f64 = ingredients.iter().filter(|i| !i.is_quantity_unknown()).map(|i| i.quantity()).sum();

    match ingredients.iter().position(|i| i.is_quantity_unknown()) {
        Some(idx) => ingredients[idx].set_quantity(total.quantity() - known),
        None => total.set_quantity(known),
    }
}

// Every quantity is known by now.
fn solve_concentration<I: MixtureEntity, T: MixtureEntity>(ingredients: &mut [I], total: &mut T) {
    let known: f64 = ingredients
        .iter()
        .filter(|i| !i.is_concentration_unknown())
        .map(|i| i.weighted_quantity())
        .sum();

    match ingredients.iter().position(|i| i.is_concentration_unknown()) {
        Some(idx) => {
            let missing = total.weighted_quantity() - known;
            let quantity = ingredients[idx].quantity();
            ingredients[idx].set_concentration(missing / quantity);
        }
        None => {
            let quantity = total.quantity();
            total.set_concentration(known / quantity);
        }
    }
}
