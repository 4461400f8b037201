//! Read-only queries over the cached game dataset.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::CacheResult;
use crate::domain::models::Dataset;
use crate::services::games_cache::GamesCache;

/// Games whose `name` contains `needle`, ignoring case.
///
/// The needle is matched literally. Records without a string `name` never
/// match.
pub fn filter_by_name(games: &[Value], needle: &str) -> Vec<Value> {
    let needle = needle.to_lowercase();
    games
        .iter()
        .filter(|game| {
            game.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Games carrying a table file with `id == table_id`.
///
/// Each match is returned with `tableFiles` removed and the matching entry
/// under `table`.
pub fn filter_by_table_id(games: &[Value], table_id: &str) -> Vec<Value> {
    games
        .iter()
        .filter_map(|game| {
            let table = game
                .get("tableFiles")
                .and_then(Value::as_array)?
                .iter()
                .find(|table| table.get("id").and_then(Value::as_str) == Some(table_id))?;

            let mut record = game.as_object()?.clone();
            record.remove("tableFiles");
            record.insert("table".to_string(), table.clone());
            Some(Value::Object(record))
        })
        .collect()
}

/// Query front over [`GamesCache`]. Holds no cache state of its own.
#[derive(Clone)]
pub struct QueryService {
    cache: GamesCache,
}

impl QueryService {
    /// Create a query service reading through `cache`.
    pub fn new(cache: GamesCache) -> Self {
        Self { cache }
    }

    /// The complete dataset.
    pub async fn all_games(&self) -> CacheResult<Arc<Dataset>> {
        self.cache.get_or_refresh().await
    }

    /// Games matching a case-insensitive name fragment.
    pub async fn games_by_name(&self, name: &str) -> CacheResult<Vec<Value>> {
        let games = self.cache.get_or_refresh().await?;
        Ok(filter_by_name(&games, name))
    }

    /// Games owning the table file `table_id`.
    pub async fn games_by_table_id(&self, table_id: &str) -> CacheResult<Vec<Value>> {
        let games = self.cache.get_or_refresh().await?;
        Ok(filter_by_table_id(&games, table_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> Vec<Value> {
        vec![
            json!({"name": "Medieval Madness", "tableFiles": [{"id": "mm-vpx"}]}),
            json!({
                "name": "Twilight Zone",
                "tableFiles": [{"id": "tz-vpx", "version": "1.2"}, {"id": "tz-fp"}]
            }),
            json!({"id": "no-name"}),
        ]
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let found = filter_by_name(&sample(), "medieval");
        assert_eq!(found, vec![sample()[0].clone()]);

        let found = filter_by_name(&sample(), "LIGHT z");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], "Twilight Zone");
    }

    #[test]
    fn test_name_filter_treats_pattern_characters_literally() {
        assert!(filter_by_name(&sample(), ".*").is_empty());
        assert!(filter_by_name(&sample(), "(").is_empty());
    }

    #[test]
    fn test_name_filter_skips_unnamed_records() {
        let found = filter_by_name(&sample(), "");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_table_filter_moves_match_under_table() {
        let found = filter_by_table_id(&sample(), "tz-fp");
        assert_eq!(found, vec![json!({"name": "Twilight Zone", "table": {"id": "tz-fp"}})]);
    }

    #[test]
    fn test_table_filter_keeps_other_fields() {
        let games = vec![json!({
            "name": "Twilight Zone",
            "manufacturer": "Bally",
            "tableFiles": [{"id": "a"}, {"id": "b", "version": "2"}]
        })];
        let found = filter_by_table_id(&games, "b");
        assert_eq!(
            found[0],
            json!({"name": "Twilight Zone", "manufacturer": "Bally", "table": {"id": "b", "version": "2"}})
        );
        assert!(found[0].get("tableFiles").is_none());
    }

    #[test]
    fn test_table_filter_no_match() {
        assert!(filter_by_table_id(&sample(), "missing").is_empty());
    }

    #[test]
    fn test_table_filter_multiple_games() {
        let games = vec![
            json!({"name": "A", "tableFiles": [{"id": "shared"}, {"id": "a"}]}),
            json!({"name": "B", "tableFiles": [{"id": "shared"}]}),
        ];
        let found = filter_by_table_id(&games, "shared");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["table"], json!({"id": "shared"}));
        assert_eq!(found[1]["name"], "B");
    }

    proptest! {
        #[test]
        fn prop_name_matches_contain_needle(
            names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..20),
            needle in "[a-zA-Z]{0,3}",
        ) {
            let games: Vec<Value> = names.iter().map(|n| json!({"name": n})).collect();
            let found = filter_by_name(&games, &needle);

            prop_assert!(found.len() <= games.len());
            for game in &found {
                let name = game["name"].as_str().unwrap().to_lowercase();
                prop_assert!(name.contains(&needle.to_lowercase()));
            }
        }
    }
}
