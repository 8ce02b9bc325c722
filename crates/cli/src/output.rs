//! Plain-text rendering of command results.
//!
//! Every renderer returns a `String`; `main` is the only place that prints.

use handlekurv_app::Receipt;
use handlekurv_core::{
    Cart, Page, PhysicalStore, Product, Profile, Recipe, RecommendedRecipes, Sale, SavingsTotals,
};

/// One line per product.
pub fn product_page(page: &Page<Product>) -> String {
    if page.data.is_empty() {
        return "No products found.".to_string();
    }

    let mut lines: Vec<String> = page.data.iter().map(product_line).collect();
    lines.push(format!(
        "Page {}{}",
        page.meta.current_page,
        page.meta
            .last_page
            .map_or_else(String::new, |last| format!(" of {last}"))
    ));
    lines.join("\n")
}

/// Shown where a product has no price.
const NO_PRICE: &str = "–";

fn product_line(product: &Product) -> String {
    let store = product
        .store
        .as_ref()
        .map_or_else(String::new, |store| format!(" @ {}", store.name));
    format!("[{}] {} | {}{store}", product.id, product.name, price(product))
}

/// Shelf price, or the sale price followed by the shelf price it replaces.
fn price(product: &Product) -> String {
    let shelf = product
        .current_price
        .map_or_else(|| NO_PRICE.to_string(), |price| price.to_string());

    match (product.is_discounted(), product.effective_price()) {
        (true, Some(sale_price)) => {
            let deal = product
                .sale
                .as_ref()
                .and_then(Sale::describe)
                .map_or_else(String::new, |deal| format!(", {deal}"));
            format!("{sale_price} (was {shelf}{deal})")
        }
        _ => shelf,
    }
}

/// Detailed view of one product.
pub fn product_detail(product: &Product) -> String {
    let mut lines = vec![product_line(product)];

    if let Some(deal) = product.sale.as_ref().and_then(Sale::describe) {
        lines.push(format!("Deal: {deal}"));
    }
    if let Some(brand) = &product.brand {
        lines.push(format!("Brand: {brand}"));
    }
    if let Some(unit_price) = product.current_unit_price {
        let unit = product.weight_unit.as_deref().unwrap_or("unit");
        lines.push(format!("Unit price: {unit_price}/{unit}"));
    }
    if let Some(ean) = &product.ean {
        lines.push(format!("EAN: {ean}"));
    }
    if let Some(description) = &product.description {
        lines.push(description.trim().to_string());
    }
    if !product.price_history.is_empty() {
        lines.push("Price history:".to_string());
        lines.extend(
            product
                .price_history
                .iter()
                .map(|point| format!("  {} {}", point.date, point.price)),
        );
    }
    if !product.allergens.is_empty() {
        let contains: Vec<&str> = product
            .allergens
            .iter()
            .filter(|allergen| allergen.contains == "YES")
            .map(|allergen| allergen.display_name.as_str())
            .collect();
        if !contains.is_empty() {
            lines.push(format!("Contains: {}", contains.join(", ")));
        }
    }

    lines.join("\n")
}

/// The shopping list grouped by store.
pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "The shopping list is empty.".to_string();
    }

    let mut lines = Vec::new();
    for group in cart.group_by_store() {
        lines.push(format!("{} ({})", group.store_name, group.total()));
        lines.extend(group.items.iter().map(|item| {
            format!(
                "  [{}] {} x {} = {}",
                item.product.id,
                item.quantity,
                item.product.name,
                item.line_total()
            )
        }));
    }
    lines.push(format!("Total: {}", cart.total()));
    lines.join("\n")
}

/// Running savings totals.
pub fn savings(totals: &SavingsTotals) -> String {
    format!(
        "Money saved: {}\nCO2 saved: {}",
        totals.money_saved, totals.co2_saved
    )
}

/// Summary of a settled purchase.
pub fn receipt(receipt: &Receipt) -> String {
    let mut lines = vec![format!(
        "Purchased {} product(s) at {}",
        receipt.settled.len(),
        receipt.settled_at.format("%Y-%m-%d %H:%M")
    )];
    lines.push(format!(
        "Saved {} ({} for items, {} for bags) and {}",
        receipt.delta.total_money(),
        receipt.delta.base_money,
        receipt.delta.bonus_money,
        receipt.delta.co2
    ));
    lines.push(savings(&receipt.totals));
    lines.join("\n")
}

/// The stored profile.
pub fn profile(profile: Option<&Profile>) -> String {
    let Some(profile) = profile else {
        return "No profile saved. Use `handlekurv profile set` to create one.".to_string();
    };

    [
        format!("Name: {}", profile.name),
        format!("Gender: {}", profile.gender.label()),
        format!("Weight: {} kg", profile.weight),
        format!("Height: {} cm", profile.height),
        format!("Age: {}", profile.age),
        format!("Activity: {}", profile.activity.label()),
        format!("Objective: {}", profile.objective.label()),
    ]
    .join("\n")
}

/// Physical stores, one per line.
pub fn stores(stores: &[PhysicalStore]) -> String {
    if stores.is_empty() {
        return "No stores found.".to_string();
    }

    stores
        .iter()
        .map(|store| {
            let address = store.address.as_deref().unwrap_or("address unknown");
            let hours = store
                .opening_hours
                .monday
                .as_deref()
                .map_or_else(String::new, |hours| format!(" | Mon {hours}"));
            format!("[{}] {} ({}) | {address}{hours}", store.id, store.name, store.group)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A meal plan, section by section.
pub fn recipes(plan: &RecommendedRecipes) -> String {
    if plan.is_empty() {
        return "No recipes recommended.".to_string();
    }

    let sections = [
        ("Breakfast", &plan.breakfast),
        ("Lunch", &plan.lunch),
        ("Dinner", &plan.dinner),
        ("Suggestions", &plan.suggestions),
    ];

    let mut lines = Vec::new();
    for (title, recipes) in sections {
        if recipes.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        lines.extend(recipes.iter().map(recipe_line));
    }
    lines.join("\n")
}

fn recipe_line(recipe: &Recipe) -> String {
    let ingredients: Vec<String> = recipe
        .ingredients()
        .into_iter()
        .map(|(quantity, part)| match quantity {
            Some(quantity) => format!("{quantity} {part}"),
            None => part,
        })
        .collect();

    let mut line = format!(
        "  [{}] {} ({:.0} kcal, {} steps)",
        recipe.recipe_id,
        recipe.name,
        recipe.calories,
        recipe.instruction_steps().len()
    );
    if !ingredients.is_empty() {
        line.push_str(&format!("\n    {}", ingredients.join(", ")));
    }
    line
}
