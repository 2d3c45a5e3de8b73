//! Tests for operation document discovery and loading
use std::fs;
use std::path::Path;

use graphql_operations_validator::loader::DocumentLoader;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
    fs::write(path, content).expect("write file");
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = dir.path();
    write(root, "schema.graphql", "type Query { users: [String] }");
    write(root, "queries/users.graphql", "query Users { users }");
    write(root, "queries/nested/more.graphql", "query More { users }");
    write(root, "queries/empty.graphql", "  \n");
    write(
        root,
        "src/App.tsx",
        "import { gql } from '@apollo/client';\n\nconst Q = gql`\n  query FromCode { users }\n`;\n",
    );
    write(root, "src/util.ts", "export const answer = 42;\n");
    write(root, "README.md", "# docs");
    dir
}

#[tokio::test]
async fn test_glob_loads_graphql_files_in_path_order() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path()).exclude("schema.graphql");

    let documents = loader.load("**/*.graphql").await.expect("load documents");
    let locations: Vec<&str> = documents.iter().map(|d| d.location.as_str()).collect();

    assert_eq!(documents.len(), 2);
    assert!(locations[0].ends_with("queries/nested/more.graphql"));
    assert!(locations[1].ends_with("queries/users.graphql"));
    assert_eq!(documents[1].source, "query Users { users }");
}

#[tokio::test]
async fn test_schema_file_is_not_a_document() {
    let dir = fixture();

    let with_schema = DocumentLoader::new(dir.path())
        .discover("*.graphql")
        .expect("discover");
    assert!(with_schema.iter().any(|p| p.ends_with("schema.graphql")));

    let without_schema = DocumentLoader::new(dir.path())
        .exclude("schema.graphql")
        .discover("*.graphql")
        .expect("discover");
    assert!(!without_schema.iter().any(|p| p.ends_with("schema.graphql")));
}

#[tokio::test]
async fn test_single_star_stays_in_one_directory() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path());

    let top_level = loader.discover("*.graphql").expect("discover");
    assert_eq!(top_level.len(), 1);
    assert!(top_level[0].ends_with("schema.graphql"));

    let queries = loader.discover("queries/*.graphql").expect("discover");
    let names: Vec<_> = queries
        .iter()
        .map(|p| p.strip_prefix(dir.path()).expect("under root").to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            Path::new("queries/empty.graphql").to_path_buf(),
            Path::new("queries/users.graphql").to_path_buf(),
        ]
    );

    let nested = loader.discover("queries/*/*.graphql").expect("discover");
    assert_eq!(nested.len(), 1);
    assert!(nested[0].ends_with("queries/nested/more.graphql"));
}

#[tokio::test]
async fn test_code_file_templates_are_separate_documents() {
    let dir = fixture();
    write(
        dir.path(),
        "src/pair.ts",
        "const A = gql`{ a }`;\nconst B = gql`{ b }`;\n",
    );
    let loader = DocumentLoader::new(dir.path());

    let documents = loader.load("src/pair.ts").await.expect("load documents");

    assert_eq!(documents.len(), 2);
    assert!(documents.iter().all(|d| d.location.ends_with("pair.ts")));
    assert_eq!(documents[0].source.trim(), "{ a }");
    assert_eq!(documents[1].source.trim(), "{ b }");
    assert_eq!(documents[1].source.lines().position(|l| l.contains("{ b }")), Some(1));
}

#[tokio::test]
async fn test_code_files_are_plucked() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path());

    let documents = loader.load("src/**/*.{ts,tsx}").await.expect("load documents");

    assert_eq!(documents.len(), 1);
    assert!(documents[0].location.ends_with("App.tsx"));

    // The operation keeps its line in the source file
    let line = documents[0]
        .source
        .lines()
        .position(|l| l.contains("query FromCode"))
        .expect("operation line");
    assert_eq!(line, 3);
}

#[tokio::test]
async fn test_single_file_pointer() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path());

    let documents = loader
        .load("queries/users.graphql")
        .await
        .expect("load documents");
    assert_eq!(documents.len(), 1);
}

#[tokio::test]
async fn test_no_matches() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path());

    assert!(loader.load("**/*.gql").await.expect("load").is_empty());
    assert!(loader.load("missing/**/*.graphql").await.expect("load").is_empty());
}

#[tokio::test]
async fn test_unsupported_files_are_skipped() {
    let dir = fixture();
    let loader = DocumentLoader::new(dir.path());

    let documents = loader.load("*.md").await.expect("load documents");
    assert!(documents.is_empty());
}
