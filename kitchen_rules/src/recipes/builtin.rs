//! The "laws of nature": recipes every kitchen knows.

use super::Rule;
use crate::items::{ItemId, ResultDescriptor};
use crate::methods::CookingMethod;

use CookingMethod::{Bake, Blend, Boil, Chop, Fry, Mix};

const BUILTIN: &[(&[&str], CookingMethod, &str, &str, &str)] = &[
    // Single-ingredient transformations
    (&["potato"], Boil, "Boiled Potato", "🥔", "Softened and ready for mashing."),
    (&["egg"], Boil, "Boiled Egg", "🥚", "Hardened and nutritious."),
    (&["egg"], Fry, "Fried Egg", "🍳", "Crispy edges and a runny yolk."),
    (&["potato"], Fry, "French Fries", "🍟", "Golden, crispy, and salty."),
    (&["tomato"], Blend, "Tomato Puree", "🥫", "Smooth, concentrated tomato base."),
    (&["tomato"], Chop, "Diced Tomato", "🍅", "Perfectly cubed for salads."),
    (&["onion"], Chop, "Diced Onion", "🧅", "The start of every great dish."),
    (&["cucumber"], Boil, "Pickled Cucumber", "🥒", "Tangy and preserved."),
    (&["cucumber"], Chop, "Diced Cucumber", "🥒", "Small cubes of fresh cucumber."),
    (&["lettuce"], Chop, "Shredded Lettuce", "🥬", "Perfectly sliced for wraps."),
    (&["fruit"], Blend, "Fruit Smoothie", "🥤", "A refreshing blended fruit drink."),
    // Combinations
    (&["flour", "water"], Mix, "Dough", "🥟", "Elastic and ready for shaping."),
    (&["flour", "egg"], Mix, "Raw Pasta", "📏", "Freshly kneaded pasta strands."),
    (&["tomato", "onion"], Mix, "Tomato Sauce", "🥫", "A savory red base."),
    (&["diced_tomato", "diced_onion"], Mix, "Salad", "🥗", "Mix diced vegetables for a simple salad."),
    (&["cucumber", "tomato"], Mix, "Salad", "🥗", "Slice cucumber and tomato for a refreshing salad."),
    (&["bread", "cucumber"], Mix, "Cucumber Sandwich", "🥪", "A light and refreshing snack."),
    (&["flour", "milk"], Mix, "Pancakes", "🥞", "Mix and cook for fluffy pancakes."),
    (&["water", "lemon"], Mix, "Lemonade", "🍋", "Sweet and sour refreshment."),
    (&["milk", "chocolate"], Mix, "Hot Chocolate", "☕", "Warm and comforting."),
    (&["dough", "tomato_sauce"], Mix, "Pizza Base", "🫓", "The foundation of a masterpiece."),
    (&["pizza_base", "cheese"], Bake, "Pizza", "🍕", "The ultimate comfort food."),
    (&["bread", "cheese"], Mix, "Sandwich", "🥪", "Classic cheese between bread."),
    (&["rice", "egg"], Fry, "Fried Rice", "🍚", "Stir-fried rice with savory egg."),
    (&["tortilla", "meat"], Mix, "Taco", "🌮", "A flavorful handheld treat."),
    (&["chocolate", "cream"], Mix, "Chocolate Fondue", "🍫", "Rich, melted chocolate dip."),
];

/// The built-in recipe table, in lookup order.
pub fn builtin_rules() -> Vec<Rule> {
    BUILTIN
        .iter()
        .map(|(ingredients, method, name, emoji, description)| {
            Rule::new(
                ingredients.iter().map(|id| ItemId::from(*id)),
                *method,
                ResultDescriptor::new(*name, *emoji, *description),
            )
        })
        .collect()
}
