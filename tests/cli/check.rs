use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, JPA_STORE, person_project};

#[test]
fn test_check_clean_project() -> Result<()> {
    let test = person_project()?;

    assert_cmd_snapshot!(test.check_command());

    assert!(!test.exists("target"));

    Ok(())
}

#[test]
fn test_check_reports_missing_without_writing() -> Result<()> {
    let test = person_project()?;
    fs::remove_file(test.root().join("src/main/resources/sql/person/all.sql"))?;

    assert_cmd_snapshot!(test.check_command());

    assert!(!test.exists(JPA_STORE));

    Ok(())
}

#[test]
fn test_check_ignores_existing_store() -> Result<()> {
    let test = person_project()?;
    test.write_file(JPA_STORE, "broken=\\u12\n")?;

    assert_cmd_snapshot!(test.check_command());

    assert_eq!(test.read_file(JPA_STORE)?, "broken=\\u12\n");

    Ok(())
}

#[test]
fn test_check_reports_all_problems_in_one_pass() -> Result<()> {
    let test = CliTest::with_file(
        "src/main/java/io/example/Repos.java",
        r#"package io.example;

import org.springframework.data.jpa.repository.Query;

class Repos {
    @Query(name = "a.sql", countName = "a-count.sql")
    void a();

    @org.springframework.data.jdbc.repository.query.Query(name = "b.sql")
    void b();
}
"#,
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_verbose_warns_about_non_literal_names() -> Result<()> {
    let test = CliTest::with_file(
        "src/main/java/Repo.java",
        r#"import org.springframework.data.jpa.repository.Query;

interface Repo {
    @Query(name = Queries.ALL)
    void all();
}
"#,
    )?;

    assert_cmd_snapshot!(test.check_command().arg("-v"));

    Ok(())
}

#[test]
fn test_config_file_is_used() -> Result<()> {
    let test = CliTest::with_file(
        ".namedsqlrc.json",
        r#"{
            "includes": ["app/src"],
            "resourceRoots": ["app/sql"],
            "flavors": ["jdbc"]
        }"#,
    )?;
    test.write_file(
        "app/src/Repo.java",
        r#"import org.springframework.data.jdbc.repository.query.Query;

interface Repo {
    @Query(name = "present.sql")
    void present();
}
"#,
    )?;
    test.write_file("app/sql/present.sql", "select 1")?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_invalid_config_is_internal_error() -> Result<()> {
    let test = CliTest::with_file(".namedsqlrc.json", r#"{ "ignores": ["[oops"] }"#)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}
