use crate::{
    db::{db::Db, query::ListOptions, record::Record, registry::Entity},
    libs::{
        form::{EntityInput, FieldKind, FieldSpec, FormModel, FormValues},
        messages::Message,
    },
    msg_bail_anyhow, msg_error, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Select};

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(value_enum)]
    entity: Entity,
}

pub async fn cmd(args: AddArgs) -> Result<()> {
    let (_, db) = super::open()?;

    let input = prompt_input(&db, args.entity, &FormValues::new()).await?;
    let id = input.add(&db).await?;
    msg_success!(Message::RecordAdded(args.entity.to_string(), id));
    Ok(())
}

/// Prompts for every field until the whole form validates.
pub(crate) async fn prompt_input(db: &Db, entity: Entity, initial: &FormValues) -> Result<EntityInput> {
    let model = FormModel::for_entity(entity);
    let mut values = initial.clone();

    loop {
        for field in model.fields() {
            let current = values.get(field.name).cloned().unwrap_or_default();
            let value = match field.kind {
                FieldKind::Reference(target) => select_reference(db, field, target, &current).await?,
                _ => prompt_text(field, &current)?,
            };
            values.insert(field.name.to_string(), value);
        }

        match EntityInput::from_form(entity, &values) {
            Ok(input) => return Ok(input),
            Err(errors) => {
                for error in errors {
                    msg_error!(error);
                }
                msg_print!(Message::FormRetry);
            }
        }
    }
}

fn prompt_text(field: &FieldSpec, current: &str) -> Result<String> {
    let label = if field.required {
        field.label.to_string()
    } else {
        Message::OptionalField(field.label.to_string()).to_string()
    };
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(!field.required)
        .validate_with(|value: &String| field.check(value).map_err(|error| error.to_string()))
        .interact_text()?;
    Ok(value.trim().to_string())
}

async fn select_reference(db: &Db, field: &FieldSpec, target: Entity, current: &str) -> Result<String> {
    let options = db.list(target, &ListOptions::default()).await?;
    if options.is_empty() {
        msg_bail_anyhow!(Message::ReferenceListEmpty(field.label.to_string(), target.to_string()));
    }

    let labels: Vec<String> = options
        .iter()
        .map(|record| format!("{}: {}", record.display("id"), reference_label(target, record)))
        .collect();
    let ids = options.ids("id");
    let default = ids
        .iter()
        .position(|id| id.to_string() == current)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(field.label)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(ids.get(selection).map(i64::to_string).unwrap_or_default())
}

fn reference_label(target: Entity, record: &Record) -> String {
    match target {
        Entity::Locations => format!("{} ({})", record.display("hall_name"), record.display("theatre_name")),
        Entity::Productions | Entity::Plays => record.display("title"),
        Entity::Theatres => record.display("name"),
        _ => record.display("full_name"),
    }
}
