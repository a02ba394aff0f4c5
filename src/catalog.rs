use std::{fmt, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use typed_floats::tf64::NonNaN;
use ureq::get;

/// Price applied when the source document has none for an item.
pub const DEFAULT_PRICE: f64 = 99.0;

const SEPARATOR: &str = " - ";

/// Where the catalog document lives: fetched once per run, read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(x) => write!(f, "{x}"),
            Self::Path(x) => write!(f, "{}", x.display()),
        }
    }
}

// category labels encode "Main - Sub"; a missing separator means no sub
pub fn split_category(label: &str) -> (&str, Option<&str>) {
    match label.split_once(SEPARATOR) {
        Some((main, sub)) => (main, Some(sub)),
        None => (label, None),
    }
}

#[derive(Debug, Deserialize)]
struct RawDoc {
    products: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    category: String,
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    description: String,
    filename: String,
    price: Option<NonNaN>,
    color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: NonNaN,
    pub full_category: String,
    pub main_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIndex {
    /// Full labels in encounter order, duplicates kept.
    pub categories: Vec<String>,
    /// Deduplicated, order of first appearance.
    pub main_categories: Vec<String>,
}

impl CategoryIndex {
    pub fn sub_categories(&self, main: &str) -> Vec<&str> {
        let prefix = format!("{main}{SEPARATOR}");
        self.categories
            .iter()
            .filter_map(|x| x.strip_prefix(&prefix))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub index: CategoryIndex,
}

impl Catalog {
    pub fn load(source: &Source) -> Result<Self> {
        let text = match source {
            Source::Url(url) => get(url)
                .call()
                .with_context(|| format!("Failed to fetch catalog: {url}"))?
                .into_string()?,
            Source::Path(path) => read_to_string(path)
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?,
        };

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let doc: RawDoc =
            serde_json::from_str(text).context("Failed to parse catalog document")?;

        let mut products = Vec::new();
        let mut categories = Vec::new();
        for group in doc.products {
            let (main, sub) = split_category(&group.category);
            for item in group.items {
                products.push(Product {
                    id: products.len() as u32 + 1,
                    name: item.name,
                    description: item.description,
                    filename: item.filename,
                    color: item.color,
                    price: item.price.unwrap_or_else(default_price),
                    full_category: group.category.clone(),
                    main_category: main.to_string(),
                    sub_category: sub.map(str::to_string),
                });
            }
            categories.push(group.category);
        }

        let main_categories = categories
            .iter()
            .map(|x| split_category(x).0.to_string())
            .unique()
            .collect();

        log::debug!(
            "loaded {} products across {} categories",
            products.len(),
            categories.len()
        );

        Ok(Self {
            products,
            index: CategoryIndex {
                categories,
                main_categories,
            },
        })
    }

    pub fn product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|x| x.id == id)
    }
}

fn default_price() -> NonNaN {
    NonNaN::new(DEFAULT_PRICE).expect("hardcoded")
}
