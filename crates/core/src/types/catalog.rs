//! Catalog search and ordering.
//!
//! The marketplace API only returns the full product list, so searching and
//! sorting happen on our side after the fetch.

use core::str::FromStr;

use super::product::Product;

/// Keep products whose title contains `query`, ignoring case.
///
/// A blank query keeps everything.
///
/// ```
/// # use digishelf_core::{Price, Product, ProductId, filter_by_title};
/// # let p = |id, title: &str| Product {
/// #     id: ProductId::new(id), title: title.into(), description: String::new(),
/// #     price: Price::FREE, cover_image_url: String::new(), file_path: None,
/// # };
/// let products = vec![p(1, "Alpha"), p(2, "Beta")];
/// let hits = filter_by_title(products, "al");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].title, "Alpha");
/// ```
#[must_use]
pub fn filter_by_title(products: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .collect()
}

/// Listing order selected by the `sort` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Whatever order the API returned.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Title,
}

impl SortOrder {
    /// Value used in the `sort` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Title => "title",
        }
    }

    /// Parse a `sort` query parameter, falling back to [`SortOrder::Featured`].
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|p| p.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "title" => Ok(Self::Title),
            _ => Err(()),
        }
    }
}

/// Sort products in place. The sort is stable.
pub fn sort_products(products: &mut [Product], order: SortOrder) {
    match order {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => products.sort_by_key(|p| p.price),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Title => products.sort_by_cached_key(|p| p.title.to_lowercase()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Price, ProductId};

    fn product(id: i64, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            price: Price::from_cents(cents).unwrap(),
            cover_image_url: String::new(),
            file_path: None,
        }
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let products = vec![product(1, "Alpha", 0), product(2, "Beta", 0)];
        assert_eq!(titles(&filter_by_title(products.clone(), "al")), ["Alpha"]);
        assert_eq!(titles(&filter_by_title(products.clone(), "ETA")), ["Beta"]);
        assert_eq!(titles(&filter_by_title(products, "A")), ["Alpha", "Beta"]);
    }

    #[test]
    fn test_blank_filter_keeps_everything() {
        let products = vec![product(1, "Alpha", 0), product(2, "Beta", 0)];
        assert_eq!(filter_by_title(products, "   ").len(), 2);
    }

    #[test]
    fn test_sort_orders() {
        let mut products = vec![
            product(1, "beta", 300),
            product(2, "Alpha", 100),
            product(3, "gamma", 200),
        ];

        sort_products(&mut products, SortOrder::PriceAsc);
        assert_eq!(titles(&products), ["Alpha", "gamma", "beta"]);

        sort_products(&mut products, SortOrder::PriceDesc);
        assert_eq!(titles(&products), ["beta", "gamma", "Alpha"]);

        sort_products(&mut products, SortOrder::Title);
        assert_eq!(titles(&products), ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_featured_keeps_api_order() {
        let mut products = vec![product(1, "b", 2), product(2, "a", 1)];
        sort_products(&mut products, SortOrder::Featured);
        assert_eq!(titles(&products), ["b", "a"]);
    }

    #[test]
    fn test_sort_param_parsing() {
        assert_eq!(SortOrder::from_param(Some("price-asc")), SortOrder::PriceAsc);
        assert_eq!(SortOrder::from_param(Some("bogus")), SortOrder::Featured);
        assert_eq!(SortOrder::from_param(None), SortOrder::Featured);
        assert_eq!(SortOrder::PriceDesc.as_param(), "price-desc");
    }
}
