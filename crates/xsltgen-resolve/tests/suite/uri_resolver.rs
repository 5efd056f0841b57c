use url::Url;
use xsltgen_resolve::{
    FilterRegistry, ResolveError, SourceDirResolver, SourceResolver, UriResolver,
};

use super::support::{write_file, Project};

fn resolver(project: &Project) -> UriResolver {
    UriResolver::from_config(&project.config(), &FilterRegistry::with_builtins()).unwrap()
}

#[test]
fn malformed_base_uri_falls_back_to_the_project_root() {
    let project = Project::new();
    let inc = project.write("inc.xsl", "<inc/>");

    let source = resolver(&project)
        .resolve("inc.xsl", Some("not a uri"))
        .unwrap()
        .expect("inc.xsl resolved from the project root");
    assert_eq!(source.path(), inc);
    assert_eq!(source.text(), "<inc/>");
}

#[test]
fn includes_resolve_next_to_the_including_file() {
    let project = Project::new();
    let main = project.write("xsl/main.xsl", "<main/>");
    let part = project.write("xsl/inc/part.xsl", "<part/>");
    let resolver = resolver(&project);

    let main_source = resolver.resolve_as_source("xsl/main.xsl").unwrap();
    assert_eq!(main_source.path(), main);
    assert_eq!(
        main_source.system_id(),
        &Url::from_file_path(std::fs::canonicalize(&main).unwrap()).unwrap()
    );

    let included = resolver
        .resolve("inc/part.xsl", Some(main_source.system_id().as_str()))
        .unwrap()
        .expect("include resolved relative to its base");
    assert_eq!(
        std::fs::canonicalize(included.path()).unwrap(),
        std::fs::canonicalize(&part).unwrap()
    );
    assert_eq!(included.text(), "<part/>");
}

#[test]
fn base_relative_lookup_falls_back_to_the_layered_search() {
    let project = Project::new();
    let main = project.write("xsl/main.xsl", "<main/>");
    let common = project.write("common.xsl", "<common/>");
    let base = Url::from_file_path(&main).unwrap();

    let source = resolver(&project)
        .resolve("common.xsl", Some(base.as_str()))
        .unwrap()
        .unwrap();
    assert_eq!(source.path(), common);
}

#[test]
fn non_file_base_uri_is_ignored() {
    let project = Project::new();
    project.write("inc.xsl", "<inc/>");

    let source = resolver(&project)
        .resolve("inc.xsl", Some("http://example.com/xsl/main.xsl"))
        .unwrap();
    assert!(source.is_some());
}

#[test]
fn unresolvable_references_are_absent_not_errors() {
    let project = Project::new();
    let resolver = resolver(&project);
    assert!(resolver.resolve("optional.xsl", None).unwrap().is_none());
    assert!(resolver
        .resolve("optional.xsl", Some("not a uri"))
        .unwrap()
        .is_none());
}

#[test]
fn missing_template_is_an_error_naming_the_tried_path() {
    let project = Project::new();
    let err = resolver(&project).resolve_as_source("missing.xsl").unwrap_err();
    match err {
        ResolveError::NotFound { path } => assert_eq!(path, project.root.join("missing.xsl")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undecodable_source_is_an_error_with_its_path() {
    let project = Project::new();
    let bad = write_file(&project.root.join("bad.xsl"), &[b'<', 0xFF, b'>']);

    let err = resolver(&project).resolve_as_source("bad.xsl").unwrap_err();
    match err {
        ResolveError::Decode { path, .. } => assert_eq!(path, bad),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn source_dir_is_tried_first() {
    let project = Project::new();
    project.write("a.xsl", "project");
    project.write("shared.xsl", "shared");
    let src_dir = project.root.join("src/main/xml");
    let local = write_file(&src_dir.join("a.xsl"), b"source dir");

    let resolver = SourceDirResolver::new(&src_dir, resolver(&project));
    let source = resolver.resolve("a.xsl", None).unwrap().unwrap();
    assert_eq!(source.path(), local);
    assert_eq!(source.text(), "source dir");

    let fallback = resolver.resolve("shared.xsl", Some("not a uri")).unwrap().unwrap();
    assert_eq!(fallback.text(), "shared");
}
