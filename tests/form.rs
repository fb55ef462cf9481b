#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::error::ValidationError;
    use curtain::db::plays::Play;
    use curtain::db::registry::Entity;
    use curtain::db::venues::{Location, Theatre};
    use curtain::libs::form::{EntityInput, FieldKind, FormModel, FormValues};

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
    }

    #[test]
    fn test_every_entity_has_a_form() {
        for entity in Entity::ALL {
            let model = FormModel::for_entity(entity);
            assert_eq!(model.entity, entity);
            assert!(model.fields().iter().any(|field| field.required), "{} has no required field", entity);
        }
        let location = FormModel::for_entity(Entity::Locations);
        assert_eq!(
            location.field("theatre_id").map(|field| field.kind),
            Some(FieldKind::Reference(Entity::Theatres))
        );
        assert!(location.field("city").is_none());
    }

    #[test]
    fn test_validate_all_collects_every_error() {
        let model = FormModel::for_entity(Entity::Locations);
        let errors = model
            .validate_all(&values(&[("hall_name", "X"), ("capacity", "0")]))
            .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, vec!["theatre_id", "hall_name", "capacity"]);
        assert_eq!(errors[0].error, ValidationError::Required { field: "theatre_id" });
        assert_eq!(errors[0].to_string(), "Theatre: theatre_id is required");
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let model = FormModel::for_entity(Entity::Plays);
        assert!(model.validate_all(&values(&[("title", "Hamlet"), ("year_written", " ")])).is_ok());
        assert!(model.validate_all(&values(&[("title", "Hamlet"), ("year_written", "999")])).is_err());
    }

    #[test]
    fn test_from_form_builds_typed_record() {
        let input = EntityInput::from_form(
            Entity::Plays,
            &values(&[
                ("title", " Hamlet "),
                ("genre", "Tragedy"),
                ("year_written", "1600"),
                ("description", ""),
            ]),
        )
        .unwrap();

        assert_eq!(input.entity(), Entity::Plays);
        let EntityInput::Play(play) = input else {
            panic!("expected a play");
        };
        assert_eq!(play.title, "Hamlet");
        assert_eq!(play.year_written, Some(1600));
        assert_eq!(play.description, None);
    }

    #[test]
    fn test_from_form_session_kind_follows_entity() {
        let form = values(&[
            ("datetime", "2024-03-01 19:00:00"),
            ("location_id", "1"),
            ("production_id", "2"),
        ]);
        assert_eq!(EntityInput::from_form(Entity::Rehearsals, &form).unwrap().entity(), Entity::Rehearsals);
        assert_eq!(EntityInput::from_form(Entity::Performances, &form).unwrap().entity(), Entity::Performances);

        let errors = EntityInput::from_form(Entity::Rehearsals, &values(&[("datetime", "01.03.2024")])).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[tokio::test]
    async fn test_edit_round_trip() {
        let db = Db::open_in_memory().unwrap();
        let theatre = db.add(&Theatre::new("Globe", Some("London"))).await.unwrap();
        let hall = db.add(&Location::new(theatre, "Main Hall", None)).await.unwrap();

        let model = FormModel::for_entity(Entity::Locations);
        let record = db.get_record(Entity::Locations, hall).await.unwrap().unwrap();
        let mut form = model.values_from(&record);
        assert_eq!(form["theatre_id"], theatre.to_string());
        assert_eq!(form["capacity"], "");

        form.insert("capacity".to_string(), "300".to_string());
        EntityInput::from_form(Entity::Locations, &form)
            .unwrap()
            .update(&db, hall)
            .await
            .unwrap();

        let stored = db.get::<Location>(hall).await.unwrap().unwrap();
        assert_eq!(stored.capacity, Some(300));
        assert_eq!(stored.hall_name, "Main Hall");
    }

    #[tokio::test]
    async fn test_add_from_form() {
        let db = Db::open_in_memory().unwrap();
        let input = EntityInput::from_form(Entity::Plays, &values(&[("title", "Tartuffe")])).unwrap();
        let id = input.add(&db).await.unwrap();
        assert_eq!(db.get::<Play>(id).await.unwrap().unwrap().title, "Tartuffe");
    }
}
