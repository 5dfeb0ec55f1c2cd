/// Listing category groups.
///
/// Every category in [`CATEGORIES`] belongs to one group; the group decides
/// the glyph used for that listing's overlay marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    FoodAndDrinks,
    Fashion,
    Services,
    Electronics,
    Hardware,
    Transport,
    Farming,
    Beauty,
    Entertainment,
}

impl CategoryGroup {
    /// Marker glyph for listings in this group
    pub fn glyph(self) -> char {
        match self {
            CategoryGroup::FoodAndDrinks => '🍜',
            CategoryGroup::Fashion => '👕',
            CategoryGroup::Services => '🔧',
            CategoryGroup::Electronics => '📱',
            CategoryGroup::Hardware => '🧱',
            CategoryGroup::Transport => '🛵',
            CategoryGroup::Farming => '🌾',
            CategoryGroup::Beauty => '💄',
            CategoryGroup::Entertainment => '🎧',
        }
    }
}

/// Glyph for listings whose category is not in the catalog
pub const FALLBACK_GLYPH: char = '📌';

/// The full category catalog, grouped
pub const CATEGORIES: &[(&str, CategoryGroup)] = &[
    // Food & Drinks
    ("Street Food", CategoryGroup::FoodAndDrinks),
    ("Fresh Produce", CategoryGroup::FoodAndDrinks),
    ("Homemade Meals", CategoryGroup::FoodAndDrinks),
    ("Snacks & Soft Drinks", CategoryGroup::FoodAndDrinks),
    ("Coffee / Juice Stands", CategoryGroup::FoodAndDrinks),
    // Fashion & Accessories
    ("Thrift Clothes", CategoryGroup::Fashion),
    ("Sneakers / Slides", CategoryGroup::Fashion),
    ("Jewelry / Watches", CategoryGroup::Fashion),
    ("Caps, Shades & Belts", CategoryGroup::Fashion),
    ("Bags & Backpacks", CategoryGroup::Fashion),
    // Services & Repairs
    ("Barber / Salon Services", CategoryGroup::Services),
    ("Phone Repair / Charging Stations", CategoryGroup::Services),
    ("Shoe Repair", CategoryGroup::Services),
    ("Tailoring & Fitting", CategoryGroup::Services),
    ("Car Wash / Detailing", CategoryGroup::Services),
    // Electronics & Gadgets
    ("Used Phones / Accessories", CategoryGroup::Electronics),
    ("Bluetooth Speakers / Earphones", CategoryGroup::Electronics),
    ("Chargers, Cables, Adapters", CategoryGroup::Electronics),
    ("Gamepads, TVs, Radios", CategoryGroup::Electronics),
    // Construction & Hardware
    ("Building Materials", CategoryGroup::Hardware),
    ("Electricals", CategoryGroup::Hardware),
    ("Plumbing Supplies", CategoryGroup::Hardware),
    ("Paint & Tools", CategoryGroup::Hardware),
    ("Labour Listings", CategoryGroup::Hardware),
    // Transport & Delivery
    ("Boda Boda Delivery", CategoryGroup::Transport),
    ("Parcel Pickups", CategoryGroup::Transport),
    ("Moving Services", CategoryGroup::Transport),
    ("Car / Bike Hire", CategoryGroup::Transport),
    // Farming & Agro
    ("Animal Feed", CategoryGroup::Farming),
    ("Seeds & Fertilizers", CategoryGroup::Farming),
    ("Small Farm Equipment", CategoryGroup::Farming),
    ("Fresh Farm Produce", CategoryGroup::Farming),
    // Beauty & Health
    ("Cosmetics & Perfumes", CategoryGroup::Beauty),
    ("Herbal Products", CategoryGroup::Beauty),
    ("Gym / Fitness Coaching", CategoryGroup::Beauty),
    ("Supplements", CategoryGroup::Beauty),
    // Entertainment & Hobbies
    ("DJ / Event Services", CategoryGroup::Entertainment),
    ("Game Consoles / CDs", CategoryGroup::Entertainment),
    ("Art / Handmade Crafts", CategoryGroup::Entertainment),
    ("Photography / Video Gigs", CategoryGroup::Entertainment),
];

/// Look up the group for a category name
pub fn group_for_category(category: &str) -> Option<CategoryGroup> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, group)| *group)
}

/// Glyph for a category name, falling back for unknown categories
pub fn glyph_for_category(category: &str) -> char {
    group_for_category(category)
        .map(CategoryGroup::glyph)
        .unwrap_or(FALLBACK_GLYPH)
}
