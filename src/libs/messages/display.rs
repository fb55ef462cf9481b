use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === RECORD MESSAGES ===
            Message::RecordAdded(entity, id) => format!("Added to {} with ID {}.", entity, id),
            Message::RecordUpdated(entity, id) => format!("Updated {} record {}.", entity, id),
            Message::RecordDeleted(entity, id) => format!("Deleted {} record {}.", entity, id),
            Message::RecordNotFound(entity, id) => format!("No {} record with ID {}.", entity, id),
            Message::RecordInUse(entity, id) => {
                format!("Cannot delete {} record {}: other records still refer to it.", entity, id)
            }
            Message::NoRecordsFound(entity) => format!("No {} found.", entity),
            Message::ConfirmDelete(entity, id) => format!("Delete {} record {}?", entity, id),
            Message::OperationCancelled => "Cancelled.".to_string(),
            Message::RelatedHeader(title) => format!("{}:", title.to_uppercase()),
            Message::NothingLinked => "Nothing linked yet.".to_string(),

            // === FORM MESSAGES ===
            Message::OptionalField(label) => format!("{} (optional)", label),
            Message::FormRetry => "Please correct the fields above.".to_string(),
            Message::ReferenceListEmpty(label, entity) => {
                format!("{} needs an existing record, but there are no {} yet.", label, entity)
            }

            // === ASSOCIATION MESSAGES ===
            Message::LinksReplaced(count) => format!("Saved {} link(s).", count),
            Message::LinksCleared => "All links removed.".to_string(),
            Message::InvalidCastAssignment(value) => format!("Invalid cast entry '{}', expected ACTOR_ID:ROLE_ID", value),

            // === STATISTICS MESSAGES ===
            Message::StatsLoading => "Loading statistics...".to_string(),
            Message::StatsTimedOut(secs) => format!("Statistics did not load within {} seconds.", secs),
            Message::RefreshInProgress => "Statistics are already being loaded.".to_string(),
            Message::FilterValues(filter, values) => format!("{}: {}", filter, values),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Exported to {}", path),
            Message::InvalidExportPath(path) => format!("Cannot derive file names from '{}'", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved.".to_string(),
            Message::ConfigDeleted => "Configuration removed.".to_string(),
            Message::ConfigNotFound => "No saved configuration found.".to_string(),
            Message::ConfigInvalidValue(key, value) => format!("Invalid value '{}' for {}", value, key),
            Message::ConfigModuleDatabase => "Database".to_string(),
            Message::ConfigModuleReports => "Reports".to_string(),
            Message::PromptDatabasePath => "Database file".to_string(),
            Message::PromptRetryAttempts => "Attempts per statement when the database is busy".to_string(),
            Message::PromptRetryDelay => "Delay between attempts (ms)".to_string(),
            Message::PromptReportsDir => "Directory for exports and reports".to_string(),
            Message::RetryAttemptsRange => "At least one attempt is required".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseReady(path) => format!("Database ready at {}", path),
            Message::DatabaseVersion(current, latest) => format!("Schema version {} (latest {})", current, latest),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated.".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date.".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Applying migration v{}: {}", version, name),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationHistoryEntry(version, name, applied_at) => {
                format!("  v{}: {} (applied: {})", version, name, applied_at)
            }
        };
        write!(f, "{}", text)
    }
}
