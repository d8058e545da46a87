use apidocs_from_source::{
    change::Baseline,
    cli::Framework,
    config::DocsConfig,
    detector::FrameworkDetector,
    extractor::ControllerParser,
    model::{ChangeStatus, ControllerRecord, HeaderRecord, RequestRecord, Shape},
    parser::{AstParser, ParsedFile},
    scanner::FileScanner,
    serializer::{load_baseline, serialize_json, serialize_yaml, write_to_file},
    type_resolver::TypeResolver,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

/// Scans and parses every file of a project
fn parse_project(temp_dir: &TempDir) -> Vec<ParsedFile> {
    let scan_result = FileScanner::new(temp_dir.path().to_path_buf())
        .scan()
        .expect("Failed to scan directory");
    AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

/// Runs the full extraction the way the CLI does
fn extract(
    parsed_files: &[ParsedFile],
    config: DocsConfig,
    baseline: Baseline,
) -> Vec<ControllerRecord> {
    let framework = FrameworkDetector::detect(parsed_files).primary();
    let resolver = TypeResolver::new(parsed_files.to_vec());
    let parser = FrameworkDetector::apply_hooks(
        ControllerParser::new(config, baseline, Box::new(resolver)),
        framework,
    );
    parser.parse_all(parsed_files)
}

fn controller<'a>(records: &'a [ControllerRecord], name: &str) -> &'a ControllerRecord {
    records
        .iter()
        .find(|c| c.class_name == name)
        .unwrap_or_else(|| panic!("Controller {} not extracted", name))
}

fn request<'a>(controller: &'a ControllerRecord, method: &str) -> &'a RequestRecord {
    controller
        .request_by_method(method)
        .unwrap_or_else(|| panic!("Request {} not extracted", method))
}

fn field<'a>(shape: &'a Shape, name: &str) -> &'a Shape {
    match shape {
        Shape::Object { fields, .. } => {
            &fields
                .iter()
                .find(|f| f.name == name)
                .unwrap_or_else(|| panic!("No field {}", name))
                .shape
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

fn widget_project() -> TempDir {
    create_test_project(vec![(
        "src/api/widget_controller.rs",
        include_str!("fixtures/widget_controller.rs"),
    )])
}

fn user_project() -> TempDir {
    create_test_project(vec![
        ("src/api/user_controller.rs", include_str!("fixtures/user_controller.rs")),
        ("src/dto.rs", include_str!("fixtures/dto.rs")),
        ("src/lib.rs", "pub mod api;\npub mod dto;\n"),
    ])
}

#[test]
fn test_documented_class_without_docs_uses_method_names() {
    let temp_dir = create_test_project(vec![(
        "src/report_controller.rs",
        include_str!("fixtures/report_controller.rs"),
    )]);
    let records = extract(&parse_project(&temp_dir), DocsConfig::default(), Baseline::empty());

    let report = controller(&records, "ReportController");
    assert!(report.documented);
    assert_eq!(report.description, "ReportController");
    assert_eq!(report.package_name.as_deref(), Some("crate::report_controller"));

    let names: Vec<_> = report.requests.iter().map(|r| r.method_name.as_str()).collect();
    assert_eq!(names, vec!["daily", "totals"]);
    for request in &report.requests {
        assert_eq!(request.url, request.method_name);
        assert_eq!(request.description, request.method_name);
        assert!(request.methods.is_empty());
        assert!(request.params.is_empty());
        assert_eq!(request.change_status, ChangeStatus::New);
    }

    assert_eq!(
        request(report, "daily").response.shape,
        Shape::list(Shape::value("int"))
    );
    assert_eq!(request(report, "totals").response.shape, Shape::value("object"));
}

#[test]
fn test_marker_overrides_url_method_and_response() {
    let records = extract(&parse_project(&widget_project()), DocsConfig::default(), Baseline::empty());
    let widgets = controller(&records, "WidgetController");

    assert!(!widgets.documented);
    assert_eq!(widgets.description, "Widget endpoints.");
    assert_eq!(widgets.author.as_deref(), Some("platform-team"));

    let find = request(widgets, "find");
    assert_eq!(find.url, "/widgets");
    assert_eq!(find.methods, vec!["GET"]);
    assert_eq!(find.description, "Finds a widget.");
    assert_eq!(find.author.as_deref(), Some("platform-team"));
    assert_eq!(find.controller, "WidgetController");
    assert_eq!(find.response.type_name, "WidgetDto");
    assert_eq!(field(&find.response.shape, "id"), &Shape::value("long"));
    assert_eq!(
        field(&find.response.shape, "tags"),
        &Shape::list(Shape::value("string"))
    );
}

#[test]
fn test_excluded_param_with_tag_is_removed() {
    let records = extract(&parse_project(&widget_project()), DocsConfig::default(), Baseline::empty());
    let find = request(controller(&records, "WidgetController"), "find");

    let names: Vec<_> = find.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id"]);
}

#[test]
fn test_tag_type_is_never_overwritten_by_signature() {
    let records = extract(&parse_project(&widget_project()), DocsConfig::default(), Baseline::empty());
    let find = request(controller(&records, "WidgetController"), "find");

    // Declared as u64, documented as {string}
    assert_eq!(find.params[0].type_name.as_deref(), Some("string"));
    assert_eq!(find.params[0].description, "external widget id");
}

#[test]
fn test_arrays_and_collections_document_their_elements() {
    let records = extract(&parse_project(&widget_project()), DocsConfig::default(), Baseline::empty());
    let remove_all = request(controller(&records, "WidgetController"), "remove_all");

    let types: Vec<_> = remove_all
        .params
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_deref()))
        .collect();
    // `force` has no @param tag and is not tracked
    assert_eq!(types, vec![("ids", Some("long[]")), ("tags", Some("string[]"))]);

    assert!(remove_all.deprecated);
    assert_eq!(remove_all.author.as_deref(), Some("jane"));
    assert_eq!(remove_all.methods, vec!["DELETE"]);
    assert_eq!(remove_all.response.generics.len(), 1);
    match &remove_all.response.shape {
        Shape::List { items } => assert_eq!(field(items, "name"), &Shape::value("string")),
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_skipped_methods() {
    let records = extract(&parse_project(&widget_project()), DocsConfig::default(), Baseline::empty());
    let widgets = controller(&records, "WidgetController");

    let names: Vec<_> = widgets.requests.iter().map(|r| r.method_name.as_str()).collect();
    // broken: malformed marker, ping: no response type, undocumented: not eligible,
    // helper: not public
    assert_eq!(names, vec!["find", "remove_all", "latest"]);

    let latest = request(widgets, "latest");
    assert_eq!(latest.url, "latest");
    assert!(latest.methods.is_empty());
    assert_eq!(latest.response.type_name, "WidgetDto");
}

#[test]
fn test_auto_generate_documents_unmarked_methods() {
    let config = DocsConfig {
        auto_generate: true,
        ..DocsConfig::default()
    };
    let records = extract(&parse_project(&widget_project()), config, Baseline::empty());
    let widgets = controller(&records, "WidgetController");

    let undocumented = request(widgets, "undocumented");
    assert_eq!(undocumented.url, "undocumented");
    assert_eq!(undocumented.response.shape, Shape::value("string"));
    assert!(widgets.request_by_method("helper").is_none());
}

#[test]
fn test_actix_routes_headers_and_resolved_responses() {
    let parsed_files = parse_project(&user_project());
    assert_eq!(
        FrameworkDetector::detect(&parsed_files).primary(),
        Framework::ActixWeb
    );

    let records = extract(&parsed_files, DocsConfig::default(), Baseline::empty());
    assert_eq!(records.len(), 1);
    let users = controller(&records, "UserController");
    assert_eq!(users.base_url.as_deref(), Some("/api/users"));
    assert_eq!(users.package_name.as_deref(), Some("crate::api::user_controller"));

    let get = request(users, "get");
    assert_eq!(get.url, "/api/users/{id}");
    assert_eq!(get.methods, vec!["GET"]);
    assert_eq!(
        get.headers,
        vec![HeaderRecord {
            name: "Authorization".to_string(),
            description: "bearer token".to_string(),
        }]
    );
    // `web::Path<u64>` documents as the extracted type
    let names: Vec<_> = get.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id"]);
    assert_eq!(get.params[0].type_name.as_deref(), Some("long"));

    let data = field(&get.response.shape, "data");
    assert_eq!(field(data, "id"), &Shape::value("long"));
    assert_eq!(field(data, "userName"), &Shape::value("string"));
    assert_eq!(
        field(data, "manager"),
        &Shape::Cyclic {
            class_name: "User".to_string()
        }
    );
    match field(data, "roles") {
        Shape::List { items } => assert!(matches!(items.as_ref(), Shape::Enum { .. })),
        other => panic!("Expected list of roles, got {:?}", other),
    }

    let list = request(users, "list");
    assert_eq!(list.url, "/api/users");
    assert_eq!(list.methods, vec!["GET", "HEAD"]);
    assert!(matches!(
        field(&list.response.shape, "data"),
        Shape::List { .. }
    ));

    let create = request(users, "create");
    assert_eq!(create.url, "/api/users/register");
    assert_eq!(create.methods, vec!["POST"]);
    assert_eq!(create.params[0].name, "user");
    assert_eq!(create.params[0].type_name.as_deref(), Some("object"));
}

#[test]
fn test_plain_framework_ignores_route_macros() {
    let parsed_files = parse_project(&user_project());
    let resolver = TypeResolver::new(parsed_files.clone());
    let parser = FrameworkDetector::apply_hooks(
        ControllerParser::new(DocsConfig::default(), Baseline::empty(), Box::new(resolver)),
        Framework::Plain,
    );

    let records = parser.parse_all(&parsed_files);
    let get = request(controller(&records, "UserController"), "get");
    assert_eq!(get.url, "get");
    assert!(get.headers.is_empty());
}

#[test]
fn test_reextraction_against_itself_is_unchanged() {
    let temp_dir = user_project();
    let parsed_files = parse_project(&temp_dir);
    let first = extract(&parsed_files, DocsConfig::default(), Baseline::empty());

    // Persist and reload the way a later run would
    let baseline_path = temp_dir.path().join("docs/previous.json");
    write_to_file(&serialize_json(&first).unwrap(), &baseline_path).unwrap();
    let baseline = load_baseline(&baseline_path).unwrap();

    let second = extract(&parsed_files, DocsConfig::default(), baseline);
    for request in second.iter().flat_map(|c| &c.requests) {
        assert_eq!(
            request.change_status,
            ChangeStatus::Unchanged,
            "{} should be unchanged",
            request.url
        );
        assert!(request.previous.is_some());
    }
}

#[test]
fn test_changed_source_is_classified() {
    let parsed_files = parse_project(&user_project());
    let baseline = Baseline::new(extract(&parsed_files, DocsConfig::default(), Baseline::empty()));

    let changed_source = include_str!("fixtures/user_controller.rs")
        .replace(r#"method = "GET", method = "HEAD""#, r#"method = "GET""#)
        .replace(r#"@param id user id"#, r#"@param id {string} user id"#)
        .replace(r#"#[post("/register")]"#, r#"#[post("/signup")]"#);
    let temp_dir = create_test_project(vec![
        ("src/api/user_controller.rs", changed_source.as_str()),
        ("src/dto.rs", include_str!("fixtures/dto.rs")),
    ]);
    let records = extract(&parse_project(&temp_dir), DocsConfig::default(), baseline);
    let users = controller(&records, "UserController");

    // Dropping HEAD shrinks the method set
    assert_eq!(request(users, "list").change_status, ChangeStatus::Modified);
    // The id parameter changed type
    assert_eq!(request(users, "get").change_status, ChangeStatus::Modified);
    // The URL moved, so nothing matches
    let create = request(users, "create");
    assert_eq!(create.change_status, ChangeStatus::New);
    assert!(create.previous.is_none());
}

#[test]
fn test_yaml_output_round_trips_as_baseline() {
    let temp_dir = widget_project();
    let parsed_files = parse_project(&temp_dir);
    let first = extract(&parsed_files, DocsConfig::default(), Baseline::empty());

    let path = temp_dir.path().join("apidocs.yaml");
    write_to_file(&serialize_yaml(&first).unwrap(), &path).unwrap();
    let baseline = load_baseline(&path).unwrap();
    assert_eq!(baseline.controllers(), first.as_slice());
}
