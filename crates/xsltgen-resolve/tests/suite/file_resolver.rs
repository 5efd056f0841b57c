use std::path::PathBuf;

use xsltgen_resolve::FileResolver;

use super::support::{write_file, write_jar, Project};

#[test]
fn project_root_wins_over_classpath() {
    let project = Project::new();
    let local = project.write("xsl/common.xsl", "project");
    let lib = project.outside("lib");
    write_file(&lib.join("xsl/common.xsl"), b"classpath");

    let mut config = project.config();
    config.classpath = vec![lib];
    let resolution = FileResolver::from_config(&config).resolve("xsl/common.xsl");

    assert!(resolution.is_found());
    assert_eq!(resolution.path(), local);
}

#[test]
fn absolute_paths_are_used_as_is() {
    let project = Project::new();
    let elsewhere = write_file(&project.outside("shared/a.xsl"), b"a");

    let resolver = FileResolver::from_config(&project.config());
    let resolution = resolver.resolve(elsewhere.to_str().unwrap());
    assert!(resolution.is_found());
    assert_eq!(resolution.path(), elsewhere);
}

#[test]
fn classpath_directories_are_searched_in_order() {
    let project = Project::new();
    let first = project.outside("first");
    let second = project.outside("second");
    std::fs::create_dir_all(&first).unwrap();
    let expected = write_file(&second.join("xsl/common.xsl"), b"second");

    let mut config = project.config();
    config.classpath = vec![first, second];
    let resolution = FileResolver::from_config(&config).resolve("xsl/common.xsl");
    assert_eq!(resolution.into_found(), Some(expected));
}

#[test]
fn archive_entries_are_extracted_under_the_build_dir() {
    let project = Project::new();
    let jar = write_jar(
        &project.outside("repo/templates-1.0.jar"),
        &[("xsl/common.xsl", "<common/>")],
    );

    let mut config = project.config();
    config.classpath = vec![project.outside("missing-classes"), jar];
    let resolution = FileResolver::from_config(&config).resolve("xsl/common.xsl");

    assert!(resolution.is_found());
    assert_eq!(
        resolution.path(),
        project
            .build_dir()
            .join("xslt-generator-maven-plugin/extracts/templates-1.0.jar/xsl/common.xsl")
    );
    assert_eq!(std::fs::read_to_string(resolution.path()).unwrap(), "<common/>");
}

#[test]
fn sibling_lookups_inside_an_archive_fall_back_to_the_last_directory() {
    let project = Project::new();
    let jar = write_jar(
        &project.outside("repo/skin.jar"),
        &[("skin/main.xsl", "<main/>"), ("skin/colors.xsl", "<colors/>")],
    );

    let mut config = project.config();
    config.classpath = vec![jar];
    let resolver = FileResolver::from_config(&config);

    assert!(resolver.resolve("skin/main.xsl").is_found());
    let sibling = resolver.resolve("colors.xsl");
    assert!(sibling.is_found());
    assert!(sibling.path().ends_with("skin.jar/skin/colors.xsl"));
}

#[test]
fn a_miss_reports_the_last_candidate_tried() {
    let project = Project::new();
    let jar = write_jar(&project.outside("repo/lib.jar"), &[("a.xsl", "<a/>")]);

    let mut config = project.config();
    config.classpath = vec![project.outside("classes"), jar];
    let resolution = FileResolver::from_config(&config).resolve("nope.xsl");

    assert!(!resolution.is_found());
    assert!(resolution.path().ends_with("extracts/lib.jar/nope.xsl"));

    let without_classpath = FileResolver::from_config(&project.config()).resolve("nope.xsl");
    assert!(!without_classpath.is_found());
    assert_eq!(without_classpath.into_path(), project.root.join("nope.xsl"));
}

#[test]
fn relative_classpath_entries_resolve_against_the_project_root() {
    let project = Project::new();
    let expected = project.write("target/classes/xsl/gen.xsl", "<gen/>");

    let mut config = project.config();
    config.classpath = vec![PathBuf::from("target/classes")];
    let resolution = FileResolver::from_config(&config).resolve("xsl/gen.xsl");
    assert_eq!(resolution.into_found(), Some(expected));
}
