use serde::{Deserialize, Deserializer};

use super::pagination::first_page;

// query strings carry the page as text; anything that is not an integer
// means the first page rather than a rejected request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(first_page))
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;

    use crate::server::pagination::PageQuery;

    fn parse(uri: &str) -> i64 {
        let Query(query) = Query::<PageQuery>::try_from_uri(&uri.parse().unwrap()).unwrap();
        query.page
    }

    #[test]
    fn parses_numeric_page() {
        assert_eq!(parse("/questions?page=3"), 3);
        assert_eq!(parse("/questions?page=-2"), -2);
    }

    #[test]
    fn falls_back_to_first_page() {
        assert_eq!(parse("/questions"), 1);
        assert_eq!(parse("/questions?page="), 1);
        assert_eq!(parse("/questions?page=abc"), 1);
    }
}
