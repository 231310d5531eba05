//! Medicine catalogue and the product-name suggestion layer.
//!
//! The prescription form keeps a cached copy of the selected centre's product
//! list. Free-text input in a product-name field is matched against that cache,
//! and choosing a product fills the row's generic name from it.

use crate::constants::GENERIC_NAME_NOT_FOUND;
use serde::{Deserialize, Serialize};

/// A branded product stocked by a centre.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub generic_name: String,
    #[serde(default)]
    pub center_id: Option<String>,
}

/// Product list cached for the currently selected centre.
#[derive(Clone, Debug, Default)]
pub struct ProductCatalog {
    center_id: Option<String>,
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(center_id: Option<String>, products: Vec<Product>) -> Self {
        Self {
            center_id,
            products,
        }
    }

    pub fn center_id(&self) -> Option<&str> {
        self.center_id.as_deref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Replaces the cache after the centre selection changed.
    ///
    /// The caller fetches the new list as soon as the centre changes; there is
    /// no debounce on this path.
    pub fn set_center(&mut self, center_id: Option<String>, products: Vec<Product>) {
        tracing::debug!(
            "product catalog switched to center {:?} ({} products)",
            center_id,
            products.len()
        );
        self.center_id = center_id;
        self.products = products;
    }

    /// Products whose name contains `query`, ignoring case.
    ///
    /// Names starting with the query come first, then the rest; each group is
    /// alphabetical. Duplicate names are shown once. A blank query suggests
    /// nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<(bool, String, &Product)> = self
            .products
            .iter()
            .filter_map(|product| {
                let name = product.name.to_lowercase();
                name.contains(&needle)
                    .then(|| (!name.starts_with(&needle), name, product))
            })
            .collect();
        matches.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        matches.dedup_by(|a, b| a.1 == b.1);

        matches
            .into_iter()
            .take(limit)
            .map(|(_, _, product)| product)
            .collect()
    }

    /// Generic name for an exact product-name match.
    pub fn find_generic_name(&self, product_name: &str) -> Option<&str> {
        self.products
            .iter()
            .find(|product| product.name == product_name)
            .map(|product| product.generic_name.as_str())
    }

    /// Generic name for `product_name`, or the literal
    /// [`GENERIC_NAME_NOT_FOUND`] so a failed lookup is visible on the form.
    pub fn generic_name_or_placeholder(&self, product_name: &str) -> String {
        match self.find_generic_name(product_name) {
            Some(generic) => generic.to_string(),
            None => {
                tracing::warn!("no generic name for product '{}'", product_name);
                GENERIC_NAME_NOT_FOUND.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, generic: &str) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.into(),
            generic_name: generic.into(),
            center_id: Some("c-1".into()),
        }
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(
            Some("c-1".into()),
            vec![
                product("Panadol", "Paracetamol"),
                product("Amoxil", "Amoxicillin"),
                product("Calpol", "Paracetamol"),
                product("Augmentin", "Amoxicillin + Clavulanate"),
                product("Panadol", "Paracetamol"),
            ],
        )
    }

    #[test]
    fn suggest_orders_prefix_matches_first() {
        let catalog = catalog();
        let names: Vec<&str> = catalog
            .suggest("pol", 10)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Calpol"]);

        let names: Vec<&str> = catalog
            .suggest("A", 10)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Amoxil", "Augmentin", "Calpol", "Panadol"]);
    }

    #[test]
    fn suggest_respects_limit_and_blank_query() {
        let catalog = catalog();
        assert_eq!(catalog.suggest("a", 2).len(), 2);
        assert!(catalog.suggest("   ", 10).is_empty());
        assert!(catalog.suggest("zzz", 10).is_empty());
    }

    #[test]
    fn generic_lookup_is_exact_with_visible_fallback() {
        let catalog = catalog();
        assert_eq!(catalog.generic_name_or_placeholder("Amoxil"), "Amoxicillin");
        assert_eq!(
            catalog.generic_name_or_placeholder("amoxil"),
            GENERIC_NAME_NOT_FOUND
        );
    }

    #[test]
    fn set_center_replaces_cache() {
        let mut catalog = catalog();
        catalog.set_center(Some("c-2".into()), vec![product("Zyrtec", "Cetirizine")]);
        assert_eq!(catalog.center_id(), Some("c-2"));
        assert_eq!(catalog.find_generic_name("Panadol"), None);
        assert_eq!(catalog.find_generic_name("Zyrtec"), Some("Cetirizine"));
    }
}
