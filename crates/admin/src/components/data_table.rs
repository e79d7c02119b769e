//! Data table component types.
//!
//! These types define the configuration for the products table and the
//! per-request header state (sort links and indicators) derived from it.

use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column (also the `sort` query value).
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
    /// Extra CSS class for header and cells (alignment).
    pub class: Option<String>,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
            class: None,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            class: None,
        }
    }

    /// Right-align the column (numbers, actions).
    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.class = Some("num".to_string());
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier (DOM id of the refresh target).
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Header cells for the current sort state.
    ///
    /// A sortable column links to itself ascending, or descending when it is
    /// already the ascending sort column. `search` is carried along so sorting
    /// keeps the filter; paging restarts at page 1.
    #[must_use]
    pub fn headers(
        &self,
        sort: Option<&str>,
        descending: bool,
        search: Option<&str>,
    ) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|column| {
                let active = column.sortable && sort == Some(column.key.as_str());
                let indicator = match (active, descending) {
                    (true, false) => Some("▲"),
                    (true, true) => Some("▼"),
                    (false, _) => None,
                };
                let sort_query = column.sortable.then(|| {
                    let next_dir = if active && !descending { "desc" } else { "asc" };
                    let mut query = format!("sort={}&dir={next_dir}", column.key);
                    if let Some(search) = search {
                        query.push_str("&q=");
                        query.push_str(&encode_query_value(search));
                    }
                    query
                });

                ColumnHeader {
                    label: column.label.clone(),
                    class: column.class.clone(),
                    sort_query,
                    indicator,
                }
            })
            .collect()
    }
}

/// One rendered header cell.
#[derive(Debug, Clone)]
pub struct ColumnHeader {
    pub label: String,
    pub class: Option<String>,
    /// Query string (without `?`) that applies this column's next sort.
    pub sort_query: Option<String>,
    pub indicator: Option<&'static str>,
}

/// Build the products table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    DataTableConfig::new("products-table")
        .column(TableColumn::sortable("name", "Name"))
        .column(TableColumn::new("description", "Description"))
        .column(TableColumn::sortable("price", "Price").numeric())
        .column(TableColumn::sortable("stock", "Stock").numeric())
        .column(TableColumn::new("actions", "Actions").numeric())
        .search_placeholder("Search products by name or description...")
        .empty_state(
            "No products found",
            Some("Try adjusting your search or add a new product"),
        )
}

/// Percent-encode a query value.
fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_table_columns() {
        let config = products_table_config();
        let keys: Vec<&str> = config.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "description", "price", "stock", "actions"]);

        let sortable: Vec<&str> = config
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(sortable, vec!["name", "price", "stock"]);
    }

    #[test]
    fn test_headers_without_sort() {
        let headers = products_table_config().headers(None, false, None);
        assert_eq!(headers[0].sort_query.as_deref(), Some("sort=name&dir=asc"));
        assert!(headers[0].indicator.is_none());
        assert!(headers[1].sort_query.is_none());
    }

    #[test]
    fn test_active_ascending_column_toggles_to_descending() {
        let headers = products_table_config().headers(Some("price"), false, None);
        assert_eq!(headers[2].sort_query.as_deref(), Some("sort=price&dir=desc"));
        assert_eq!(headers[2].indicator, Some("▲"));
        // Other columns start ascending
        assert_eq!(headers[3].sort_query.as_deref(), Some("sort=stock&dir=asc"));
    }

    #[test]
    fn test_active_descending_column_toggles_back() {
        let headers = products_table_config().headers(Some("price"), true, None);
        assert_eq!(headers[2].sort_query.as_deref(), Some("sort=price&dir=asc"));
        assert_eq!(headers[2].indicator, Some("▼"));
    }

    #[test]
    fn test_search_is_carried_and_encoded() {
        let headers = products_table_config().headers(None, false, Some("green tea&co"));
        assert_eq!(
            headers[0].sort_query.as_deref(),
            Some("sort=name&dir=asc&q=green+tea%26co")
        );
    }
}
