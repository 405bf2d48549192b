use sqlx::{mysql::MySql, Encode, QueryBuilder, Type};

/// Builder for `UPDATE ... SET` statements that only touch supplied columns
///
/// Column names come from code, never from request data; values are always
/// bound parameters.
pub struct PartialUpdate<'args> {
    builder: QueryBuilder<'args, MySql>,
    columns: Vec<&'static str>,
}

impl<'args> PartialUpdate<'args> {
    /// Start an update of `table`
    pub fn new(table: &'static str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            columns: Vec::new(),
        }
    }

    /// Add `column = ?` when a value was supplied
    ///
    /// For nullable columns pass an `Option<Option<_>>`; `Some(None)` writes NULL.
    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, MySql> + Type<MySql> + Send,
    {
        if let Some(value) = value {
            if !self.columns.is_empty() {
                self.builder.push(", ");
            }
            self.builder.push(column).push(" = ").push_bind(value);
            self.columns.push(column);
        }
        self
    }

    /// Columns that will be written, in order
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Finish with a primary-key filter
    ///
    /// Returns `None` when nothing was supplied, so callers never run an
    /// `UPDATE` with an empty `SET` list.
    pub fn where_id(mut self, id: i32) -> Option<QueryBuilder<'args, MySql>> {
        if self.columns.is_empty() {
            return None;
        }
        self.builder.push(" WHERE id = ").push_bind(id);
        Some(self.builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_supplied_columns_are_set() {
        let mut update = PartialUpdate::new("amenities");
        update
            .set("name", Some("Infinity Pool".to_string()))
            .set::<String>("category", None)
            .set::<String>("icon", None);

        assert_eq!(update.columns(), ["name"]);
        let builder = update.where_id(4).unwrap();
        assert_eq!(builder.sql(), "UPDATE amenities SET name = ? WHERE id = ?");
    }

    #[test]
    fn test_multiple_columns_are_comma_separated() {
        let mut update = PartialUpdate::new("properties");
        update
            .set("title", Some("Lakeside Villa".to_string()))
            .set::<i32>("bedrooms", None)
            .set("featured", Some(true))
            .set("area_sqft", Some(2400));

        assert_eq!(update.columns(), ["title", "featured", "area_sqft"]);
        let builder = update.where_id(9).unwrap();
        assert_eq!(
            builder.sql(),
            "UPDATE properties SET title = ?, featured = ?, area_sqft = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_explicit_null_is_written() {
        let mut update = PartialUpdate::new("properties");
        update
            .set("description", Some(None::<String>))
            .set::<Option<i32>>("bedrooms", None)
            .set("agent_id", Some(None::<i32>));

        assert_eq!(update.columns(), ["description", "agent_id"]);
        let builder = update.where_id(3).unwrap();
        assert_eq!(
            builder.sql(),
            "UPDATE properties SET description = ?, agent_id = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_empty_update_builds_nothing() {
        let mut update = PartialUpdate::new("agent");
        update.set::<String>("name", None);

        assert!(update.columns().is_empty());
        assert!(update.where_id(1).is_none());
    }
}
