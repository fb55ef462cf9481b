#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use curtain::db::associations::CastAssignment;
    use curtain::db::db::Db;
    use curtain::db::people::{Actor, Director};
    use curtain::db::plays::{Play, Role};
    use curtain::db::productions::{Production, Rehearsal};
    use curtain::db::query::ListOptions;
    use curtain::db::registry::Entity;
    use curtain::db::venues::{Location, Theatre};

    #[tokio::test]
    async fn test_stage_a_production_end_to_end() {
        let db = Db::open_in_memory().unwrap();

        let globe = db.add(&Theatre::new("Globe", Some("London"))).await.unwrap();
        let hall = db.add(&Location::new(globe, "Main Hall", Some(500))).await.unwrap();
        let halls = db.list(Entity::Locations, &ListOptions::default()).await.unwrap();
        assert_eq!(halls.records()[0].display("theatre_name"), "Globe");

        let play = db.add(&Play::new("Hamlet", Some("Tragedy"), Some(1600))).await.unwrap();
        let director = db.add(&Director::new("Peter Brook", None)).await.unwrap();
        let opening = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let production = db
            .add(&Production::new("Hamlet 2024", play, director).on(opening))
            .await
            .unwrap();

        let prince = db.add(&Role::new("Hamlet", play)).await.unwrap();
        let ophelia = db.add(&Role::new("Ophelia", play)).await.unwrap();
        let anna = db.add(&Actor::new("Anna Ray", None)).await.unwrap();
        let boris = db.add(&Actor::new("Boris Lee", None)).await.unwrap();

        let cast = [CastAssignment::new(boris, prince), CastAssignment::new(anna, ophelia)];
        assert_eq!(db.set_production_cast(production, &cast).await.unwrap(), 2);

        let listed = db.cast_for_production(production).await.unwrap();
        let pairs: Vec<(String, String)> = listed
            .iter()
            .map(|row| (row.display("actor_name"), row.display("role_name")))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Anna Ray".to_string(), "Ophelia".to_string()),
                ("Boris Lee".to_string(), "Hamlet".to_string()),
            ]
        );

        let when = opening.and_hms_opt(10, 30, 0).unwrap();
        let rehearsal = db.add(&Rehearsal::new(when, Some(hall), Some(production))).await.unwrap();
        db.set_rehearsal_actors(rehearsal, &[anna, boris]).await.unwrap();
        assert_eq!(db.actors_for_rehearsal(rehearsal).await.unwrap().ids("id"), vec![anna, boris]);

        let stored = db.get::<Production>(production).await.unwrap().unwrap();
        assert_eq!(stored.production_date, Some(opening));
        let row = db.get_record(Entity::Productions, production).await.unwrap().unwrap();
        assert_eq!(row.text("production_date").as_deref(), Some("2024-09-01"));

        let rehearsal_row = db.get_record(Entity::Rehearsals, rehearsal).await.unwrap().unwrap();
        assert_eq!(rehearsal_row.text("datetime").as_deref(), Some("2024-09-01 10:30:00"));

        let err = db.delete(Entity::Productions, production).await.unwrap_err();
        assert!(err.is_integrity());
    }
}
