//! Static café menu, built once at startup and shared read-only by every handler.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Minor currency units.
    pub price: u32,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuCategory {
    #[serde(skip)]
    pub key: String,
    pub title: String,
    pub icon: String,
    pub items: Vec<MenuItem>,
}

/// Categories keep their authoring order when rendered as a JSON object.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<MenuCategory>,
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.key, category)?;
        }
        map.end()
    }
}

impl Catalog {
    pub fn new(categories: Vec<MenuCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|category| category.key == key)
    }

    pub fn cafe() -> Self {
        Self::new(vec![
            category(
                "coffee",
                "Coffee & Espresso",
                "☕",
                &[
                    ("americano", "Americano", "Rich espresso with hot water", 120, "☕"),
                    ("latte", "Latte", "Creamy espresso with steamed milk", 150, "🥛"),
                    (
                        "cappuccino",
                        "Cappuccino",
                        "Perfect balance of espresso, steamed milk and foam",
                        140,
                        "☕",
                    ),
                    (
                        "mocha",
                        "Mocha",
                        "Chocolate and espresso blend with steamed milk",
                        170,
                        "🍫",
                    ),
                    ("espresso", "Espresso", "Pure, concentrated coffee shot", 100, "☕"),
                    ("flatwhite", "Flat White", "Double espresso with microfoam milk", 160, "🥛"),
                ],
            ),
            category(
                "cold",
                "Cold Beverages",
                "🧊",
                &[
                    (
                        "iced-americano",
                        "Iced Americano",
                        "Chilled espresso with cold water",
                        130,
                        "🧊",
                    ),
                    ("iced-latte", "Iced Latte", "Cold espresso with milk over ice", 160, "🥤"),
                    ("cold-brew", "Cold Brew", "Smooth, slow-brewed cold coffee", 140, "🧊"),
                    ("frappe", "Frappe", "Blended iced coffee drink", 180, "🥤"),
                    ("iced-mocha", "Iced Mocha", "Cold chocolate coffee delight", 190, "🍫"),
                ],
            ),
            category(
                "tea",
                "Tea & Other Drinks",
                "🍵",
                &[
                    ("masala-chai", "Masala Chai", "Traditional spiced Indian tea", 80, "🍵"),
                    ("green-tea", "Green Tea", "Light and refreshing antioxidant tea", 70, "🍃"),
                    ("earl-grey", "Earl Grey", "Classic black tea with bergamot", 90, "🍵"),
                    ("hot-chocolate", "Hot Chocolate", "Rich cocoa with steamed milk", 120, "☕"),
                    (
                        "matcha-latte",
                        "Matcha Latte",
                        "Japanese green tea with steamed milk",
                        180,
                        "🍃",
                    ),
                ],
            ),
            category(
                "pastries",
                "Pastries & Baked Goods",
                "🥐",
                &[
                    (
                        "chocolate-croissant",
                        "Chocolate Croissant",
                        "Buttery croissant with chocolate",
                        80,
                        "🥐",
                    ),
                    (
                        "blueberry-muffin",
                        "Blueberry Muffin",
                        "Fresh baked with real blueberries",
                        70,
                        "🧁",
                    ),
                    (
                        "chocolate-chip-cookie",
                        "Chocolate Chip Cookie",
                        "Warm, gooey classic cookie",
                        50,
                        "🍪",
                    ),
                    (
                        "red-velvet-cupcake",
                        "Red Velvet Cupcake",
                        "Moist cake with cream cheese frosting",
                        90,
                        "🧁",
                    ),
                    ("banana-bread", "Banana Bread", "Homemade moist banana bread slice", 60, "🍞"),
                ],
            ),
            category(
                "breakfast",
                "Breakfast & Light Meals",
                "🍽️",
                &[
                    ("avocado-toast", "Avocado Toast", "Smashed avocado on artisan bread", 180, "🥑"),
                    (
                        "grilled-sandwich",
                        "Grilled Sandwich",
                        "Cheese and vegetable grilled sandwich",
                        120,
                        "🥪",
                    ),
                    (
                        "caesar-salad",
                        "Caesar Salad",
                        "Crisp lettuce with parmesan and croutons",
                        160,
                        "🥗",
                    ),
                    (
                        "breakfast-bagel",
                        "Breakfast Bagel",
                        "Everything bagel with cream cheese",
                        100,
                        "🥯",
                    ),
                    ("pancakes", "Pancakes", "Fluffy pancakes with maple syrup", 140, "🥞"),
                ],
            ),
        ])
    }
}

type ItemRow<'a> = (&'a str, &'a str, &'a str, u32, &'a str);

fn category(key: &str, title: &str, icon: &str, items: &[ItemRow<'_>]) -> MenuCategory {
    MenuCategory {
        key: key.to_string(),
        title: title.to_string(),
        icon: icon.to_string(),
        items: items
            .iter()
            .map(|(id, name, description, price, image)| MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price: *price,
                image: image.to_string(),
            })
            .collect(),
    }
}
