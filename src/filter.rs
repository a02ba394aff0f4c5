use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::catalog::{split_category, Product};

/// Sentinel selection that matches every category.
pub const ALL: &str = "All";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Original,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub main_category: String,
    pub sub_category: String,
    pub search: String,
    pub sort: SortKey,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            main_category: ALL.to_string(),
            sub_category: ALL.to_string(),
            search: String::new(),
            sort: SortKey::Original,
        }
    }
}

impl FilterState {
    pub fn matches(&self, product: &Product) -> bool {
        if self.main_category != ALL && product.main_category != self.main_category {
            return false;
        }
        if self.sub_category != ALL
            && product.sub_category.as_deref() != Some(self.sub_category.as_str())
        {
            return false;
        }

        let term = self.search.to_lowercase();
        term.is_empty()
            || product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
            || product.full_category.to_lowercase().contains(&term)
    }

    /// Filters preserving input order, then sorts; ties keep filtered order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|x| self.matches(x))
            .cloned()
            .collect();

        match self.sort {
            SortKey::Original => (),
            SortKey::NameAsc => filtered.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name))),
            SortKey::NameDesc => filtered.sort_by(|a, b| name_key(&b.name).cmp(&name_key(&a.name))),
            SortKey::PriceAsc => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        filtered
    }

    // main category button: picking a main resets the sub selection
    pub fn select_main(&mut self, main: &str) {
        self.main_category = main.to_string();
        self.sub_category = ALL.to_string();
    }

    // category dropdown: a full "Main - Sub" label sets both at once
    pub fn select_category(&mut self, label: &str) {
        if label == ALL {
            self.main_category = ALL.to_string();
            self.sub_category = ALL.to_string();
        } else {
            let (main, sub) = split_category(label);
            self.main_category = main.to_string();
            self.sub_category = sub.unwrap_or(ALL).to_string();
        }
    }

    pub fn scope(&self) -> String {
        if self.main_category == ALL {
            "all categories".to_string()
        } else if self.sub_category == ALL {
            self.main_category.clone()
        } else {
            format!("{} - {}", self.main_category, self.sub_category)
        }
    }

    pub fn summary(&self, count: usize) -> String {
        let plural = if count == 1 { "" } else { "s" };
        format!("Showing {count} product{plural} in {}", self.scope())
    }
}

// stand-in for the browser's locale collation
fn name_key(name: &str) -> String {
    name.to_lowercase()
}
