#[derive(Debug, Clone)]
pub enum Message {
    // === RECORD MESSAGES ===
    RecordAdded(String, i64),   // entity, id
    RecordUpdated(String, i64), // entity, id
    RecordDeleted(String, i64), // entity, id
    RecordNotFound(String, i64),
    RecordInUse(String, i64),
    NoRecordsFound(String),
    ConfirmDelete(String, i64),
    OperationCancelled,
    RelatedHeader(String),
    NothingLinked,

    // === FORM MESSAGES ===
    OptionalField(String),
    FormRetry,
    ReferenceListEmpty(String, String), // field label, entity

    // === ASSOCIATION MESSAGES ===
    LinksReplaced(usize),
    LinksCleared,
    InvalidCastAssignment(String),

    // === STATISTICS MESSAGES ===
    StatsLoading,
    StatsTimedOut(u64),
    RefreshInProgress,
    FilterValues(String, String), // filter, comma-separated values

    // === EXPORT MESSAGES ===
    ExportCompleted(String),
    InvalidExportPath(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigInvalidValue(String, String), // key, value
    ConfigModuleDatabase,
    ConfigModuleReports,
    PromptDatabasePath,
    PromptRetryAttempts,
    PromptRetryDelay,
    PromptReportsDir,
    RetryAttemptsRange,

    // === DATABASE MESSAGES ===
    DatabaseReady(String),
    DatabaseVersion(u32, u32), // current, latest
    DatabaseNeedsUpdate,
    DatabaseUpToDate,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationHistory,
    MigrationHistoryEntry(u32, String, String), // version, name, applied at
}
