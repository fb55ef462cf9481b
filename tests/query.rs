#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::error::DbError;
    use curtain::db::people::Actor;
    use curtain::db::plays::{Play, Role};
    use curtain::db::query::ListOptions;
    use curtain::db::registry::Entity;
    use curtain::db::venues::{Location, Theatre};
    use test_context::{test_context, AsyncTestContext};

    struct QueryTestContext {
        db: Db,
    }

    impl AsyncTestContext for QueryTestContext {
        async fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            for (name, city) in [("Globe", "Paris"), ("Nordic", "Oslo"), ("Andes", "Lima")] {
                db.add(&Theatre::new(name, Some(city))).await.unwrap();
            }
            QueryTestContext { db }
        }
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_list_sorted_descending(ctx: &mut QueryTestContext) {
        let theatres = ctx
            .db
            .list(Entity::Theatres, &ListOptions::sorted_by("city", false))
            .await
            .unwrap();

        let cities: Vec<String> = theatres.iter().map(|t| t.display("city")).collect();
        assert_eq!(cities, vec!["Paris", "Oslo", "Lima"]);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_unknown_sort_column_uses_default(ctx: &mut QueryTestContext) {
        let theatres = ctx
            .db
            .list(Entity::Theatres, &ListOptions::sorted_by("nonexistent", true))
            .await
            .unwrap();

        let names: Vec<String> = theatres.iter().map(|t| t.display("name")).collect();
        assert_eq!(names, vec!["Andes", "Globe", "Nordic"]);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_empty_search_equals_list(ctx: &mut QueryTestContext) {
        let options = ListOptions::sorted_by("name", false);
        let listed = ctx.db.list(Entity::Theatres, &options).await.unwrap();
        let searched = ctx.db.search(Entity::Theatres, "", &options).await.unwrap();
        assert_eq!(listed, searched);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_search_is_case_insensitive(ctx: &mut QueryTestContext) {
        let found = ctx.db.search(Entity::Theatres, "osl", &ListOptions::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.records()[0].display("name"), "Nordic");

        let found = ctx.db.search(Entity::Theatres, "GLOBE", &ListOptions::default()).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_search_folds_cyrillic(ctx: &mut QueryTestContext) {
        ctx.db.add(&Actor::new("Иван Петров", None)).await.unwrap();
        ctx.db.add(&Actor::new("John Smith", None)).await.unwrap();

        let found = ctx.db.search(Entity::Actors, "ИВАН", &ListOptions::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.records()[0].display("full_name"), "Иван Петров");
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_search_treats_wildcards_literally(ctx: &mut QueryTestContext) {
        let found = ctx.db.search(Entity::Theatres, "%", &ListOptions::default()).await.unwrap();
        assert!(found.is_empty());

        let found = ctx.db.search(Entity::Theatres, "_", &ListOptions::default()).await.unwrap();
        assert!(found.is_empty());
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_search_matches_joined_columns(ctx: &mut QueryTestContext) {
        let hamlet = ctx.db.add(&Play::new("Hamlet", Some("Tragedy"), Some(1600))).await.unwrap();
        ctx.db.add(&Role::new("Ophelia", hamlet)).await.unwrap();

        let roles = ctx.db.search(Entity::Roles, "hamlet", &ListOptions::default()).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles.records()[0].display("title"), "Ophelia");
        assert_eq!(roles.records()[0].display("play_title"), "Hamlet");
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_listing_includes_parent_display_columns(ctx: &mut QueryTestContext) {
        let theatres = ctx.db.search(Entity::Theatres, "Globe", &ListOptions::default()).await.unwrap();
        let globe = theatres.records()[0].int("id").unwrap();
        ctx.db.add(&Location::new(globe, "Main Hall", Some(500))).await.unwrap();

        let locations = ctx.db.list(Entity::Locations, &ListOptions::default()).await.unwrap();
        assert_eq!(locations.len(), 1);
        let hall = &locations.records()[0];
        assert_eq!(hall.display("theatre_name"), "Globe");
        assert_eq!(hall.display("city"), "Paris");
        assert_eq!(hall.int("capacity"), Some(500));
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_forced_refresh_returns_same_rows(ctx: &mut QueryTestContext) {
        let cached = ctx.db.list(Entity::Theatres, &ListOptions::default()).await.unwrap();
        let fresh = ctx.db.list(Entity::Theatres, &ListOptions::default().fresh()).await.unwrap();
        assert_eq!(cached, fresh);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_by_name_rejects_unknown_entity(ctx: &mut QueryTestContext) {
        let err = ctx.db.list_by_name("ghosts", &ListOptions::default()).await.unwrap_err();
        assert!(matches!(err, DbError::UnknownEntity(_)));

        let err = ctx.db.search_by_name("ghosts", "x", &ListOptions::default()).await.unwrap_err();
        assert!(matches!(err, DbError::UnknownEntity(_)));

        let theatres = ctx.db.list_by_name("theatres", &ListOptions::default()).await.unwrap();
        assert_eq!(theatres.len(), 3);
    }

    #[test_context(QueryTestContext)]
    #[tokio::test]
    async fn test_closed_handle_reports_not_initialized(ctx: &mut QueryTestContext) {
        let clone = ctx.db.clone();
        ctx.db.close().await.unwrap();
        assert!(!clone.is_open().await);

        let err = clone.list(Entity::Theatres, &ListOptions::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));
    }
}
