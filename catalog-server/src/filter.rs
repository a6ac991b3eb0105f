//! Product filter composition
//!
//! Parses the listing query string into a typed [`ProductFilter`] and renders
//! it into a single SQL predicate: the AND of every supplied filter. Absent
//! filters contribute nothing.
//!
//! The product table is expected under the alias `p`.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::ApiError;

/// Raw query string for `GET /products`
///
/// Everything arrives as text so that empty values (`priceFrom=`) can be
/// treated as absent and bad numbers reported as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub price_from: Option<String>,
    pub price_to: Option<String>,
    pub category_id: Option<String>,
    /// Comma-separated attribute names
    pub attribute_names: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::Name => "p.name COLLATE NOCASE",
            SortField::Price => "p.price",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Substring of the product name; ASCII letters match case-insensitively
    pub search: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub category_id: Option<i64>,
    /// Every name must be assigned to the product (AND semantics)
    pub attribute_names: Vec<String>,
    pub sort: Option<SortField>,
    pub order: SortOrder,
}

impl ProductFilter {
    pub fn from_query(query: &ProductQuery) -> Result<Self, ApiError> {
        let search = non_empty(&query.search).map(str::to_string);
        let price_from = parse_price("priceFrom", non_empty(&query.price_from))?;
        let price_to = parse_price("priceTo", non_empty(&query.price_to))?;

        let category_id = non_empty(&query.category_id)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    ApiError::Validation(format!("categoryId must be an integer, got {:?}", raw))
                })
            })
            .transpose()?;

        let attribute_names = non_empty(&query.attribute_names)
            .map(split_names)
            .unwrap_or_default();

        let sort = non_empty(&query.sort)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "name" => Ok(SortField::Name),
                "price" => Ok(SortField::Price),
                _ => Err(ApiError::Validation(format!(
                    "sort must be 'name' or 'price', got {:?}",
                    raw
                ))),
            })
            .transpose()?;

        let order = match non_empty(&query.order) {
            None => SortOrder::Asc,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                _ => {
                    return Err(ApiError::Validation(format!(
                        "order must be 'asc' or 'desc', got {:?}",
                        raw
                    )))
                }
            },
        };

        Ok(Self {
            search,
            price_from,
            price_to,
            category_id,
            attribute_names,
            sort,
            order,
        })
    }

    /// True when no filter narrows the result set
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none()
            && self.price_from.is_none()
            && self.price_to.is_none()
            && self.category_id.is_none()
            && self.attribute_names.is_empty()
    }

    /// Append the WHERE clause (nothing when unfiltered)
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut first = true;

        if let Some(search) = &self.search {
            push_separator(qb, &mut first);
            qb.push("p.name LIKE ")
                .push_bind(format!("%{}%", escape_like(search)))
                .push(" ESCAPE '\\'");
        }

        if let Some(from) = self.price_from {
            push_separator(qb, &mut first);
            qb.push("p.price >= ").push_bind(from);
        }

        if let Some(to) = self.price_to {
            push_separator(qb, &mut first);
            qb.push("p.price <= ").push_bind(to);
        }

        if let Some(category_id) = self.category_id {
            push_separator(qb, &mut first);
            qb.push("p.category_id = ").push_bind(category_id);
        }

        for name in &self.attribute_names {
            push_separator(qb, &mut first);
            qb.push(
                "EXISTS (SELECT 1 FROM product_attributes pa \
                 JOIN attributes a ON a.id = pa.attribute_id \
                 WHERE pa.product_id = p.id AND a.name = ",
            )
            .push_bind(name.clone())
            .push(")");
        }
    }

    /// Append ORDER BY; ties are always broken by product id
    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self.sort {
            Some(field) => {
                qb.push(" ORDER BY ")
                    .push(field.column())
                    .push(" ")
                    .push(self.order.keyword())
                    .push(", p.id ASC");
            }
            None => {
                qb.push(" ORDER BY p.id ASC");
            }
        }
    }
}

fn push_separator(qb: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    qb.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(field: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ApiError::Validation(format!(
            "{} must be a number, got {:?}",
            field, raw
        ))),
    }
}

/// Split the comma-separated list, dropping blanks and duplicates
fn split_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(qs: &str) -> ProductQuery {
        let uri: axum::http::Uri = format!("/products?{}", qs).parse().unwrap();
        axum::extract::Query::<ProductQuery>::try_from_uri(&uri).unwrap().0
    }

    fn sql_for(filter: &ProductFilter) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT p.id FROM products p");
        filter.push_where(&mut qb);
        filter.push_order_by(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_query_is_unfiltered() {
        let filter = ProductFilter::from_query(&ProductQuery::default()).unwrap();

        assert!(filter.is_unfiltered());
        assert_eq!(sql_for(&filter), "SELECT p.id FROM products p ORDER BY p.id ASC");
    }

    #[test]
    fn test_empty_values_are_absent() {
        let filter = ProductFilter::from_query(&query(
            "search=&priceFrom=&priceTo=%20&categoryId=&attributeNames=&sort=",
        ))
        .unwrap();

        assert!(filter.is_unfiltered());
        assert_eq!(filter.sort, None);
    }

    #[test]
    fn test_all_filters_parsed() {
        let filter = ProductFilter::from_query(&query(
            "search=Shirt&priceFrom=20&priceTo=50.5&categoryId=2\
             &attributeNames=Size,%20Color,,Size&sort=price&order=DESC",
        ))
        .unwrap();

        assert_eq!(filter.search.as_deref(), Some("Shirt"));
        assert_eq!(filter.price_from, Some(20.0));
        assert_eq!(filter.price_to, Some(50.5));
        assert_eq!(filter.category_id, Some(2));
        assert_eq!(filter.attribute_names, vec!["Size".to_string(), "Color".to_string()]);
        assert_eq!(filter.sort, Some(SortField::Price));
        assert_eq!(filter.order, SortOrder::Desc);
    }

    #[test]
    fn test_where_clause_is_conjunction() {
        let filter = ProductFilter {
            search: Some("shirt".to_string()),
            price_from: Some(20.0),
            price_to: Some(50.0),
            category_id: Some(2),
            attribute_names: vec!["Size".to_string(), "Color".to_string()],
            sort: Some(SortField::Name),
            order: SortOrder::Asc,
        };

        let sql = sql_for(&filter);

        // Attribute subqueries carry their own WHERE; the outer clause has one
        let outer = sql.split("EXISTS (").next().unwrap();
        assert!(outer.starts_with("SELECT p.id FROM products p WHERE "));
        assert_eq!(outer.matches(" WHERE ").count(), 1);
        assert_eq!(sql.matches("EXISTS (").count(), 2);
        assert_eq!(sql.matches(" AND EXISTS (").count(), 2);
        assert!(sql.contains("p.name LIKE ? ESCAPE '\\'"));
        assert!(sql.contains("p.price >= ?"));
        assert!(sql.contains("p.price <= ?"));
        assert!(sql.contains("p.category_id = ?"));
        assert!(sql.ends_with(" ORDER BY p.name COLLATE NOCASE ASC, p.id ASC"));
        assert!(!sql.contains(" OR "));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        for qs in ["priceFrom=cheap", "priceTo=NaN", "priceTo=inf", "categoryId=1.5"] {
            let result = ProductFilter::from_query(&query(qs));
            assert!(matches!(result, Err(ApiError::Validation(_))), "{} should be rejected", qs);
        }
    }

    #[test]
    fn test_invalid_sort_rejected() {
        let result = ProductFilter::from_query(&query("sort=description"));
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = ProductFilter::from_query(&query("sort=name&order=sideways"));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
