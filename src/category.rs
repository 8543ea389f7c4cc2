//! The closed set of food categories shown at the top level of the treemap

use serde::{Deserialize, Serialize};

/// Food categories, in summary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodCategory {
    Meat,
    Vegetable,
    Grain,
    Fruit,
}

/// Display metadata for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub category: FoodCategory,
    /// Node name, which is also the `Category` value in the data file
    pub name: &'static str,
    /// Human readable label
    pub label: &'static str,
    pub description: &'static str,
}

/// Category table. Order is the node order of the category summary.
pub const CATEGORIES: [CategoryInfo; 4] = [
    CategoryInfo {
        category: FoodCategory::Meat,
        name: "Meat",
        label: "Meat",
        description: "Beef, lamb, pork, poultry and other animal products",
    },
    CategoryInfo {
        category: FoodCategory::Vegetable,
        // lowercase in the data file
        name: "vegetable",
        label: "Vegetables",
        description: "Vegetables, legumes and root crops",
    },
    CategoryInfo {
        category: FoodCategory::Grain,
        name: "Grain",
        label: "Grain",
        description: "Cereals and grain products",
    },
    CategoryInfo {
        category: FoodCategory::Fruit,
        name: "Fruit",
        label: "Fruit",
        description: "Fruit and nuts",
    },
];

impl FoodCategory {
    pub const ALL: [FoodCategory; 4] = [
        FoodCategory::Meat,
        FoodCategory::Vegetable,
        FoodCategory::Grain,
        FoodCategory::Fruit,
    ];

    pub fn info(self) -> &'static CategoryInfo {
        match self {
            FoodCategory::Meat => &CATEGORIES[0],
            FoodCategory::Vegetable => &CATEGORIES[1],
            FoodCategory::Grain => &CATEGORIES[2],
            FoodCategory::Fruit => &CATEGORIES[3],
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Exact, case-sensitive match on the data file spelling
    pub fn from_name(name: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.category)
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
