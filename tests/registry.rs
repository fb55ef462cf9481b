#[cfg(test)]
mod tests {
    use curtain::db::error::DbError;
    use curtain::db::query::{compose_list, compose_search, ListOptions};
    use curtain::db::registry::{table_config, Entity};
    use rusqlite::types::Value;

    #[test]
    fn test_every_entity_is_registered() {
        for entity in Entity::ALL {
            let config = table_config(entity.name()).unwrap();
            assert!(config.is_orderable("id"), "{} has no id column", entity);
            assert!(config.is_orderable(config.default_sort), "{} default sort not orderable", entity);
            assert!(!config.searchable.is_empty(), "{} has nothing to search", entity);
        }
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let err = table_config("ghosts").unwrap_err();
        assert!(matches!(err, DbError::UnknownEntity(name) if name == "ghosts"));
        assert!("Actors".parse::<Entity>().is_err());
    }

    #[test]
    fn test_sort_column_falls_back_to_default() {
        let config = Entity::Theatres.config();
        assert_eq!(config.resolve_sort(Some("city")), "t.city");
        assert_eq!(config.resolve_sort(None), "t.name");
        assert_eq!(config.resolve_sort(Some("capacity")), "t.name");
        assert_eq!(config.resolve_sort(Some("name; DROP TABLE theatre")), "t.name");
    }

    #[test]
    fn test_logical_sort_names_map_to_joined_columns() {
        let config = Entity::Locations.config();
        assert_eq!(config.resolve_sort(Some("theatre_name")), "t.name");
        assert_eq!(config.resolve_sort(None), "l.hall_name");
        assert_eq!(
            config.orderable_columns().collect::<Vec<_>>(),
            vec!["id", "theatre_name", "hall_name", "capacity"]
        );
    }

    #[test]
    fn test_compose_list_uses_resolved_order() {
        let query = compose_list(Entity::Theatres.config(), &ListOptions::sorted_by("city", false));
        assert_eq!(query.sql, "SELECT t.* FROM theatre t ORDER BY t.city DESC");
        assert!(query.params.is_empty());

        let query = compose_list(Entity::Roles.config(), &ListOptions::default());
        assert_eq!(
            query.sql,
            "SELECT r.*, p.title AS play_title FROM role r LEFT JOIN play p ON r.play_id = p.id ORDER BY r.id ASC"
        );
    }

    #[test]
    fn test_empty_search_is_the_list_query() {
        let options = ListOptions::sorted_by("title", true);
        for entity in Entity::ALL {
            let config = entity.config();
            assert_eq!(compose_search(config, "", &options), compose_list(config, &options));
        }
    }

    #[test]
    fn test_search_binds_one_pattern_per_column() {
        let config = Entity::Actors.config();
        let query = compose_search(config, "ham", &ListOptions::default());

        assert_eq!(query.params.len(), config.searchable.len());
        assert!(query.params.iter().all(|p| *p == Value::Text("%ham%".to_string())));
        assert!(query.sql.contains("casefold(a.full_name) LIKE casefold(?)"));
        assert!(query.sql.contains(" OR "));
        assert!(!query.sql.contains("ham"));
        assert!(query.sql.ends_with("ORDER BY a.id ASC"));
    }

    #[test]
    fn test_search_escapes_wildcards() {
        let query = compose_search(Entity::Plays.config(), "100%_a\\b", &ListOptions::default());
        assert_eq!(query.params[0], Value::Text("%100\\%\\_a\\\\b%".to_string()));
    }
}
