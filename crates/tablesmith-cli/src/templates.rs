use tablesmith_core::{ColumnDefinition, Schema};

/// A ready-made schema offered as a starting point.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub table_name: &'static str,
    pub columns: &'static [(&'static str, &'static str)],
}

impl Template {
    pub fn schema(&self) -> Schema {
        self.columns
            .iter()
            .map(|(name, description)| ColumnDefinition::new(*name, *description))
            .collect()
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "Product Catalog",
        table_name: "products",
        columns: &[
            ("id", "Unique product ID"),
            ("name", "Product name"),
            ("price", "Numeric value of the product"),
            ("category", "Category of product"),
            ("in_stock", "Boolean availability flag"),
        ],
    },
    Template {
        name: "User Profiles",
        table_name: "users",
        columns: &[
            ("id", "Unique user identifier"),
            ("full_name", "User’s full name"),
            ("email", "User’s email address"),
            ("age", "User’s age"),
            ("country", "User’s country"),
        ],
    },
    Template {
        name: "Order Records",
        table_name: "orders",
        columns: &[
            ("order_id", "Unique order number"),
            ("user_id", "Associated user ID"),
            ("total_amount", "Total bill amount"),
            ("payment_status", "Paid / Pending / Failed"),
            ("created_at", "Order creation timestamp"),
        ],
    },
];

/// Look a template up by display name or table name, ignoring case.
pub fn find_template(key: &str) -> Option<&'static Template> {
    let key = key.trim();
    TEMPLATES.iter().find(|template| {
        template.name.eq_ignore_ascii_case(key) || template.table_name.eq_ignore_ascii_case(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_by_table_or_display_name() {
        assert_eq!(find_template("users").map(|t| t.name), Some("User Profiles"));
        assert_eq!(
            find_template("product catalog").map(|t| t.table_name),
            Some("products")
        );
        assert!(find_template("invoices").is_none());
    }

    #[test]
    fn template_schema_keeps_column_order() {
        let schema = find_template("orders").expect("orders").schema();
        assert_eq!(
            schema.names(),
            vec!["order_id", "user_id", "total_amount", "payment_status", "created_at"]
        );
    }
}
