use std::fs;

use tempfile::TempDir;

use buildhive_core::error::Error;
use buildhive_core::project::ProjectRole;
use buildhive_core::scanner::Scanner;

#[test]
fn test_scan_roles_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let packages_dir = temp_dir.path().join("packages");
    fs::create_dir_all(packages_dir.join("beta")).unwrap();
    fs::create_dir_all(packages_dir.join("hive-lib")).unwrap();
    fs::create_dir_all(packages_dir.join("alpha")).unwrap();
    fs::write(packages_dir.join("README.md"), "not a project").unwrap();

    let projects = Scanner::new(&packages_dir, "-lib").scan().unwrap();

    assert_eq!(projects.shared.name, "hive-lib");
    assert_eq!(projects.shared.role, ProjectRole::SharedLibrary);
    let names: Vec<&str> = projects.platforms.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert!(projects
        .platforms
        .iter()
        .all(|p| p.role == ProjectRole::Platform));
    assert_eq!(projects.shared.path, packages_dir.join("hive-lib"));
}

#[test]
fn test_scan_missing_packages_dir() {
    let temp_dir = TempDir::new().unwrap();
    let result = Scanner::new(temp_dir.path().join("packages"), "-lib").scan();
    assert!(matches!(result, Err(Error::PackagesDirNotFound(_))));
}

#[test]
fn test_scan_no_shared_library() {
    let temp_dir = TempDir::new().unwrap();
    let packages_dir = temp_dir.path().join("packages");
    fs::create_dir_all(packages_dir.join("alpha")).unwrap();

    let result = Scanner::new(&packages_dir, "-lib").scan();
    assert!(matches!(result, Err(Error::SharedLibraryNotFound { .. })));
}

#[test]
fn test_scan_ambiguous_shared_library() {
    let temp_dir = TempDir::new().unwrap();
    let packages_dir = temp_dir.path().join("packages");
    fs::create_dir_all(packages_dir.join("core-lib")).unwrap();
    fs::create_dir_all(packages_dir.join("ui-lib")).unwrap();

    let result = Scanner::new(&packages_dir, "-lib").scan();
    assert!(matches!(result, Err(Error::SharedLibraryAmbiguous { .. })));
}
