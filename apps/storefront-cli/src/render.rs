//! Plain-text rendering of a [`ViewModel`]. No terminal styling.

use std::fmt::Write;

use storefront_core::facets::FacetGroup;
use storefront_core::types::Product;
use storefront_engine::ViewModel;

pub const LOADING_LINE: &str = "Loading products...";
pub const EMPTY_LINE: &str = "No products found";

pub fn header(vm: &ViewModel) -> String {
    let filters = vm.selection.categories.len() + vm.selection.product_types.len() + vm.selection.brands.len();
    let term = if vm.term.is_empty() { "(all products)" } else { vm.term.as_str() };
    format!(
        "search: {term} | filters: {filters} | hybrid: {} | theme: {}",
        if vm.hybrid { "on" } else { "off" },
        vm.theme
    )
}

pub fn facets(vm: &ViewModel) -> String {
    let mut out = String::from("Filters\n");
    for group in FacetGroup::ALL {
        let _ = writeln!(out, "  {}", group.title());
        for row in vm.facet_rows(group) {
            let mark = if row.selected { "x" } else { " " };
            let _ = writeln!(out, "    [{mark}] {} ({})", row.label, row.count);
        }
    }
    out
}

pub fn results(vm: &ViewModel) -> String {
    if vm.loading {
        return format!("{LOADING_LINE}\n");
    }
    if vm.no_results() {
        return format!("{EMPTY_LINE}\n");
    }
    let mut out = String::new();
    for (i, product) in vm.products.iter().enumerate() {
        out.push_str(&card(i + 1, product, &vm.placeholder_image));
    }
    out
}

fn card(n: usize, product: &Product, placeholder: &str) -> String {
    let mut out = format!("[{n}] {}", product.name);
    if !product.brand.is_empty() {
        let _ = write!(out, " | {}", product.brand);
    }
    let _ = writeln!(out, "\n    {}  image: {}", product.display_price(), product.image_or(placeholder));
    if !product.description.trim().is_empty() {
        let _ = writeln!(out, "    {}", product.description.trim());
    }
    if !product.tags.is_empty() {
        let tags: Vec<String> = product.tags.iter().map(|t| format!("#{t}")).collect();
        let _ = writeln!(out, "    {}", tags.join(" "));
    }
    out
}

pub fn suggestions(vm: &ViewModel) -> String {
    if !vm.suggestions_visible {
        return String::new();
    }
    let mut out = String::new();
    for (i, s) in vm.suggestions.iter().enumerate() {
        let marker = if vm.active_suggestion == Some(i) { '>' } else { ' ' };
        let _ = write!(out, "{marker} {}. {}", i + 1, s.name);
        if let Some(brand) = s.brand.as_deref().filter(|b| !b.is_empty()) {
            let _ = write!(out, " ({brand})");
        }
        out.push('\n');
    }
    out
}

pub fn detail(vm: &ViewModel) -> String {
    let detail = &vm.detail;
    if !detail.open {
        return String::new();
    }
    if let Some(message) = &detail.error {
        return format!("{message}\n");
    }
    let Some(entity) = &detail.entity else {
        return "Loading product details...\n".to_string();
    };

    let mut out = format!("{}\n", entity.name);
    if !entity.brand.is_empty() {
        let _ = writeln!(out, "  {}", entity.brand);
    }
    let kind: Vec<&str> =
        [entity.category.as_deref(), entity.product_type.as_deref()].into_iter().flatten().filter(|s| !s.is_empty()).collect();
    if !kind.is_empty() {
        let _ = writeln!(out, "  {}", kind.join(" • "));
    }
    let _ = writeln!(out, "  {}", entity.display_price());
    if let Some(rating) = entity.rating {
        let _ = writeln!(out, "  Rating: {rating}/5");
    }
    let _ = writeln!(out, "  image: {}", entity.image_or(&vm.placeholder_image));
    if !entity.description.trim().is_empty() {
        let _ = writeln!(out, "\n  {}", entity.description.trim());
    }
    if !entity.tag_list.is_empty() {
        let _ = writeln!(out, "  tags: {}", entity.tag_list.join(", "));
    }
    out
}

/// Header, results and any open detail view.
pub fn screen(vm: &ViewModel) -> String {
    let mut out = format!("{}\n\n{}", header(vm), results(vm));
    let detail = detail(vm);
    if !detail.is_empty() {
        let _ = write!(out, "\n{detail}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use storefront_core::facets::FacetSelection;
    use storefront_core::theme::Theme;
    use storefront_core::types::{FacetBucket, FacetCounts, Generation, Suggestion};
    use storefront_engine::DetailState;

    fn view() -> ViewModel {
        ViewModel {
            term: "lamp".into(),
            selection: FacetSelection::default(),
            hybrid: false,
            theme: Theme::Light,
            buffer: "lamp".into(),
            suggestions: Vec::new(),
            suggestions_visible: false,
            active_suggestion: None,
            generation: Generation::default(),
            loading: false,
            products: Vec::new(),
            facets: FacetCounts::default(),
            detail: DetailState::default(),
            placeholder_image: "/placeholder-product.svg".into(),
        }
    }

    #[test]
    fn cards_show_price_placeholder_and_tags() {
        let mut vm = view();
        vm.products = vec![serde_json::from_value(json!({
            "id": "1", "name": "Desk Lamp", "brand": "Lumen", "price": 12.5,
            "description": "Warm light", "tags": ["led", "desk"]
        }))
        .unwrap()];

        assert_eq!(
            results(&vm),
            "[1] Desk Lamp | Lumen\n    USD 12.50  image: /placeholder-product.svg\n    Warm light\n    #led #desk\n"
        );
    }

    #[test]
    fn loading_and_empty_states() {
        let mut vm = view();
        assert_eq!(results(&vm), "No products found\n");
        vm.loading = true;
        assert_eq!(results(&vm), "Loading products...\n");
    }

    #[test]
    fn facet_panel_marks_selection_and_labels_blanks() {
        let mut vm = view();
        vm.selection = FacetSelection::default().toggle(FacetGroup::Brands, "Acme");
        vm.facets = FacetCounts {
            brands: vec![FacetBucket::new("Acme", 3), FacetBucket::new("", 2)],
            ..FacetCounts::default()
        };

        assert_eq!(
            facets(&vm),
            "Filters\n  Categories\n  Brands\n    [x] Acme (3)\n    [ ] Others (2)\n  Types\n"
        );
    }

    #[test]
    fn suggestion_panel_marks_active_row() {
        let mut vm = view();
        vm.suggestions = vec![
            Suggestion { id: "1".into(), name: "Red Shoes".into(), brand: Some("Acme".into()) },
            Suggestion { id: "2".into(), name: "Red Socks".into(), brand: None },
        ];
        vm.suggestions_visible = true;
        vm.active_suggestion = Some(1);

        assert_eq!(suggestions(&vm), "  1. Red Shoes (Acme)\n> 2. Red Socks\n");
    }

    #[test]
    fn detail_shows_rating_and_error() {
        let mut vm = view();
        vm.detail.open = true;
        vm.detail.entity = Some(
            serde_json::from_value(json!({
                "id": 4, "name": "Lamp", "brand": "Lumen", "price": "19.5",
                "category": "home", "product_type": "lighting", "rating": 4.5
            }))
            .unwrap(),
        );
        let text = detail(&vm);
        assert!(text.contains("home • lighting"));
        assert!(text.contains("Rating: 4.5/5"));
        assert!(text.contains("USD 19.50"));

        vm.detail.entity = None;
        vm.detail.error = Some(storefront_engine::DETAIL_ERROR_MESSAGE.into());
        assert_eq!(detail(&vm), "Failed to load product details\n");
    }
}
