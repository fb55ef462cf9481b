#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::error::{DbError, ValidationError};
    use curtain::db::people::Actor;
    use curtain::db::plays::Play;
    use curtain::db::registry::Entity;
    use curtain::db::venues::{Location, Theatre};
    use test_context::{test_context, AsyncTestContext};

    struct CrudTestContext {
        db: Db,
    }

    impl AsyncTestContext for CrudTestContext {
        async fn setup() -> Self {
            CrudTestContext {
                db: Db::open_in_memory().unwrap(),
            }
        }
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_add_and_get(ctx: &mut CrudTestContext) {
        let hamlet = Play::new("Hamlet", Some("Tragedy"), Some(1600)).with_description("Prince of Denmark");
        let id = ctx.db.add(&hamlet).await.unwrap();
        let play = ctx.db.get::<Play>(id).await.unwrap().unwrap();

        assert_eq!(play.id, Some(id));
        assert_eq!(play.title, "Hamlet");
        assert_eq!(play.genre.as_deref(), Some("Tragedy"));
        assert_eq!(play.year_written, Some(1600));
        assert_eq!(play.description.as_deref(), Some("Prince of Denmark"));
        assert!(ctx.db.get::<Play>(id + 1).await.unwrap().is_none());
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_text_is_trimmed_and_blanks_are_null(ctx: &mut CrudTestContext) {
        let mut theatre = Theatre::new("  Globe  ", Some("London"));
        theatre.street = Some("   ".to_string());
        let id = ctx.db.add(&theatre).await.unwrap();

        let stored = ctx.db.get::<Theatre>(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Globe");
        assert_eq!(stored.street, None);
        assert_eq!(stored.house_number, None);

        let record = ctx.db.get_record(Entity::Theatres, id).await.unwrap().unwrap();
        assert_eq!(record.text("street"), None);
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_update_overwrites_fields(ctx: &mut CrudTestContext) {
        let id = ctx.db.add(&Actor::new("Anna Ray", None)).await.unwrap();
        ctx.db.update(id, &Actor::new("Anna Ray-Moss", Some("Ten years"))).await.unwrap();

        let actor = ctx.db.get::<Actor>(id).await.unwrap().unwrap();
        assert_eq!(actor.full_name, "Anna Ray-Moss");
        assert_eq!(actor.experience.as_deref(), Some("Ten years"));
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_missing_rows_report_not_found(ctx: &mut CrudTestContext) {
        let err = ctx.db.update(42, &Actor::new("Anna Ray", None)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "actors", id: 42 }));

        let err = ctx.db.delete(Entity::Theatres, 42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "theatres", id: 42 }));
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_invalid_update_leaves_row_unchanged(ctx: &mut CrudTestContext) {
        let id = ctx.db.add(&Actor::new("Anna Ray", None)).await.unwrap();
        let err = ctx.db.update(id, &Actor::new("A1", None)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let actor = ctx.db.get::<Actor>(id).await.unwrap().unwrap();
        assert_eq!(actor.full_name, "Anna Ray");
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_referenced_rows_cannot_be_deleted(ctx: &mut CrudTestContext) {
        let theatre = ctx.db.add(&Theatre::new("Globe", None)).await.unwrap();
        let hall = ctx.db.add(&Location::new(theatre, "Main Hall", Some(500))).await.unwrap();

        let err = ctx.db.delete(Entity::Theatres, theatre).await.unwrap_err();
        assert!(err.is_integrity());
        assert!(ctx.db.get::<Theatre>(theatre).await.unwrap().is_some());

        ctx.db.delete(Entity::Locations, hall).await.unwrap();
        ctx.db.delete(Entity::Theatres, theatre).await.unwrap();
        assert!(ctx.db.get::<Theatre>(theatre).await.unwrap().is_none());
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_dangling_reference_is_integrity_error(ctx: &mut CrudTestContext) {
        let err = ctx.db.add(&Location::new(999, "Main Hall", None)).await.unwrap_err();
        assert!(err.is_integrity());
    }

    #[test_context(CrudTestContext)]
    #[tokio::test]
    async fn test_validation_runs_before_store(ctx: &mut CrudTestContext) {
        let err = ctx.db.add(&Location::new(0, "Main Hall", Some(10))).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { field: "theatre_id" })
        ));

        let theatre = ctx.db.add(&Theatre::new("Globe", None)).await.unwrap();
        let err = ctx.db.add(&Location::new(theatre, "Main Hall", Some(0))).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Capacity { .. })));

        let locations = ctx.db.list(Entity::Locations, &Default::default()).await.unwrap();
        assert!(locations.is_empty());
    }
}
