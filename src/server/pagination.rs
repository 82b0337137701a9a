use serde::Deserialize;

use super::deserializers::deserialize_page;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

pub fn first_page() -> i64 {
    1
}

/// Returns the 1-based `page` of `items`. Pages before the first one or past
/// the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: i64) -> Vec<T> {
    let Ok(index) = usize::try_from(page.saturating_sub(1)) else {
        return Vec::new();
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE).min(items.len());
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_holds_first_ten() {
        assert_eq!(paginate(&numbers(25), 1), numbers(10));
    }

    #[test]
    fn pages_are_consecutive_slices() {
        let items = numbers(25);
        assert_eq!(paginate(&items, 2), (11..=20).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3), vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = numbers(25);
        assert!(paginate(&items, 4).is_empty());
        assert!(paginate(&items, 0).is_empty());
        assert!(paginate(&items, -3).is_empty());
        assert!(paginate(&items, i64::MAX).is_empty());
        assert!(paginate(&items, i64::MIN).is_empty());
        assert!(paginate::<i64>(&[], 1).is_empty());
    }

    #[test]
    fn page_never_exceeds_page_size() {
        let items = numbers(95);
        for page in 1..=10 {
            assert!(paginate(&items, page).len() <= QUESTIONS_PER_PAGE);
        }
    }
}
