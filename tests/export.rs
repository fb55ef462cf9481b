#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use curtain::db::db::Db;
    use curtain::db::people::Director;
    use curtain::db::plays::Play;
    use curtain::db::productions::Production;
    use curtain::db::query::ListOptions;
    use curtain::db::record::RecordSet;
    use curtain::db::registry::Entity;
    use curtain::db::stats::ReportData;
    use curtain::db::venues::Theatre;
    use curtain::libs::export::{default_file_name, ExportFormat, Exporter};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct ExportTestContext {
        db: Db,
        dir: TempDir,
    }

    impl AsyncTestContext for ExportTestContext {
        async fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            let mut globe = Theatre::new("Globe", Some("London"));
            globe.postal_code = Some("SE1 9DT".to_string());
            db.add(&globe).await.unwrap();
            db.add(&Theatre::new("Nordic, Main", Some("Oslo"))).await.unwrap();

            let play = db.add(&Play::new("Hamlet", Some("Tragedy"), Some(1600))).await.unwrap();
            let director = db.add(&Director::new("Peter Brook", None)).await.unwrap();
            db.add(&Production::new("Hamlet 2024", play, director)).await.unwrap();

            ExportTestContext {
                db,
                dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl ExportTestContext {
        async fn theatres(&self) -> RecordSet {
            self.db
                .list(Entity::Theatres, &ListOptions::sorted_by("name", true))
                .await
                .unwrap()
        }
    }

    #[test]
    fn test_default_file_name_has_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 5, 7).unwrap();
        assert_eq!(default_file_name("theatres", ExportFormat::Csv, at), "theatres_20240301_090507.csv");
        assert_eq!(default_file_name("report", ExportFormat::Excel, at), "report_20240301_090507.xlsx");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_output_path_defaults_to_reports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(ExportFormat::Json, None, "actors", dir.path());
        let path = exporter.output_path();

        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("actors_"));
        assert!(name.ends_with(".json"));
        assert_eq!(exporter.format(), ExportFormat::Json);
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_export_csv(ctx: &mut ExportTestContext) {
        let path = ctx.dir.path().join("nested").join("theatres.csv");
        let exporter = Exporter::new(ExportFormat::Csv, Some(path.clone()), "theatres", ctx.dir.path());
        let written = exporter.export_records("theatres", &ctx.theatres().await).unwrap();
        assert_eq!(written, path);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["id", "name", "city", "street", "house_number", "postal_code"]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Globe");
        assert_eq!(&rows[0][5], "SE1 9DT");
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][1], "Nordic, Main");
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_export_json(ctx: &mut ExportTestContext) {
        let path = ctx.dir.path().join("theatres.json");
        Exporter::new(ExportFormat::Json, Some(path.clone()), "theatres", ctx.dir.path())
            .export_records("theatres", &ctx.theatres().await)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Globe");
        assert_eq!(rows[0]["street"], serde_json::Value::Null);
        assert!(rows[0]["id"].is_i64());
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_export_excel(ctx: &mut ExportTestContext) {
        let path = ctx.dir.path().join("theatres.xlsx");
        Exporter::new(ExportFormat::Excel, Some(path.clone()), "theatres", ctx.dir.path())
            .export_records("theatres", &ctx.theatres().await)
            .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_export_empty_listing(ctx: &mut ExportTestContext) {
        let actors = ctx.db.list(Entity::Actors, &ListOptions::default()).await.unwrap();
        let path = ctx.dir.path().join("actors.xlsx");
        Exporter::new(ExportFormat::Excel, Some(path.clone()), "actors", ctx.dir.path())
            .export_records("actors", &actors)
            .unwrap();
        assert!(path.exists());
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_report_csv_writes_file_per_section(ctx: &mut ExportTestContext) {
        let report = ReportData::gather(&ctx.db).await.unwrap();
        let path = ctx.dir.path().join("theatre_report.csv");
        let written = Exporter::new(ExportFormat::Csv, Some(path), "theatre_report", ctx.dir.path())
            .export_report(&report)
            .unwrap();

        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|file| file.exists()));
        assert_eq!(written[0], ctx.dir.path().join("theatre_report_productions.csv"));
        assert_eq!(written[5], ctx.dir.path().join("theatre_report_rehearsals_by_month.csv"));

        let productions = fs::read_to_string(&written[0]).unwrap();
        assert!(productions.contains("Hamlet 2024"));
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_report_json_has_export_date(ctx: &mut ExportTestContext) {
        let report = ReportData::gather(&ctx.db).await.unwrap();
        let path = ctx.dir.path().join("report.json");
        Exporter::new(ExportFormat::Json, Some(path.clone()), "report", ctx.dir.path())
            .export_report(&report)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["export_date"].is_string());
        assert_eq!(json["productions"][0]["production_title"], "Hamlet 2024");
        assert_eq!(json["genres"][0]["genre"], "Tragedy");
        assert!(json["rehearsals_by_month"].as_array().unwrap().is_empty());
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_report_excel_workbook(ctx: &mut ExportTestContext) {
        let report = ReportData::gather(&ctx.db).await.unwrap();
        let path = ctx.dir.path().join("reports").join("report.xlsx");
        let written = Exporter::new(ExportFormat::Excel, Some(path.clone()), "report", ctx.dir.path())
            .export_report(&report)
            .unwrap();

        assert_eq!(written, vec![path.clone()]);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
