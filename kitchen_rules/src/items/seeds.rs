//! The starting shelf.

use super::Item;

const SEEDS: &[(&str, &str, &str)] = &[
    ("Tomato", "🍅", "Plump and juicy red fruit."),
    ("Onion", "🧅", "Strong-smelling layered bulb."),
    ("Cucumber", "🥒", "Cool and crisp green vegetable."),
    ("Lettuce", "🥬", "Fresh, crunchy leaves."),
    ("Egg", "🥚", "A versatile protein source."),
    ("Cheese", "🧀", "Rich, fermented dairy."),
    ("Flour", "🌾", "Finely ground grain."),
    ("Water", "💧", "Pure, clear H2O."),
    ("Meat", "🥩", "Savory animal protein."),
    ("Potato", "🥔", "A starchy root vegetable."),
    ("Salt", "🧂", "The fundamental seasoning."),
    ("Fruit", "🍎", "Sweet or tart botanical fruit."),
    ("Rice", "🍚", "Essential staple grain."),
    ("Milk", "🥛", "Creamy dairy liquid."),
    ("Butter", "🧈", "Churned cream fat."),
    ("Sugar", "🍬", "Sweet crystalline goodness."),
    ("Chicken", "🍗", "Versatile poultry meat."),
    ("Fish", "🐟", "Fresh from the waters."),
    ("Herbs", "🌿", "Fragrant culinary leaves."),
    ("Spices", "🌶️", "Pungent or aromatic seasonings."),
    ("Chocolate", "🍫", "Rich cacao treat."),
    ("Cream", "🥄", "Thick dairy fat."),
    ("Yogurt", "🥛", "Tangy fermented milk."),
    ("Lemon", "🍋", "Zesty citrus fruit."),
    ("Ice", "🧊", "Solidified water."),
    ("Oil", "🫙", "Liquid fat for cooking."),
];

/// The ingredients every new kitchen starts with.
pub fn seed_items() -> Vec<Item> {
    SEEDS
        .iter()
        .map(|(name, emoji, description)| Item::new(*name, *emoji, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let items = seed_items();
        let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), items.len());
        assert_eq!(items.len(), 26);
    }

    #[test]
    fn test_seeds_are_undiscovered() {
        assert!(seed_items().iter().all(|i| i.is_seed()));
    }
}
