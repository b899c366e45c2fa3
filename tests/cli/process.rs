use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, JDBC_STORE, JPA_STORE, person_project};

#[test]
fn test_process_writes_store() -> Result<()> {
    let test = person_project()?;

    assert_cmd_snapshot!(test.process_command());

    assert_eq!(
        test.read_file(JPA_STORE)?,
        "#generated by namedsql\n\
         sql/person/all.sql=select *\\n  from person\n\
         sql/person/count.sql=select count(*) from person\n"
    );
    assert!(!test.exists(JDBC_STORE));

    Ok(())
}

#[test]
fn test_missing_resource_fails() -> Result<()> {
    let test = person_project()?;
    fs::remove_file(test.root().join("src/main/resources/sql/person/count.sql"))?;

    assert_cmd_snapshot!(test.process_command());

    // The resolved entry is still merged.
    assert_eq!(
        test.read_file(JPA_STORE)?,
        "#generated by namedsql\nsql/person/all.sql=select *\\n  from person\n"
    );

    Ok(())
}

#[test]
fn test_existing_entries_are_kept() -> Result<()> {
    let test = person_project()?;
    test.write_file(JPA_STORE, "X=1\nsql/person/all.sql=stale\n")?;

    assert_cmd_snapshot!(test.process_command());

    assert_eq!(
        test.read_file(JPA_STORE)?,
        "#generated by namedsql\n\
         X=1\n\
         sql/person/all.sql=select *\\n  from person\n\
         sql/person/count.sql=select count(*) from person\n"
    );

    Ok(())
}

#[test]
fn test_process_is_idempotent() -> Result<()> {
    let test = person_project()?;

    test.process_command().status()?;
    let first = test.read_file(JPA_STORE)?;
    test.process_command().status()?;
    let second = test.read_file(JPA_STORE)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_plain_query_names_only() -> Result<()> {
    let test = CliTest::with_file(
        "src/main/java/io/example/PersonRepository.java",
        r#"import org.springframework.data.jpa.repository.Query;

interface PersonRepository {
    @Query(name = "Person.findByLastname")
    List<Person> findByLastname(String lastname);
}
"#,
    )?;

    assert_cmd_snapshot!(test.process_command());

    assert!(!test.exists("target"));

    Ok(())
}

#[test]
fn test_unreadable_store_is_replaced() -> Result<()> {
    let test = person_project()?;
    test.write_file(JPA_STORE, "old=1\nbroken=\\u12\n")?;

    assert_cmd_snapshot!(test.process_command());

    assert_eq!(
        test.read_file(JPA_STORE)?,
        "#generated by namedsql\n\
         sql/person/all.sql=select *\\n  from person\n\
         sql/person/count.sql=select count(*) from person\n"
    );

    Ok(())
}

#[test]
fn test_manifest_with_cli_overrides() -> Result<()> {
    let test = CliTest::with_file(
        "declarations.json",
        r#"{
            "elements": [
                {
                    "name": "OrderRepository.open",
                    "location": { "file": "src/OrderRepository.java", "line": 7, "col": 5 },
                    "annotations": [
                        {
                            "type": "org.springframework.data.jdbc.repository.query.Query",
                            "parameters": { "name": "orders/open.sql" }
                        }
                    ]
                },
                {
                    "name": "OrderRepository.closed",
                    "annotations": [
                        {
                            "type": "org.springframework.data.jdbc.repository.query.Query",
                            "parameters": { "name": "orders/closed.SQL" }
                        }
                    ]
                }
            ]
        }"#,
    )?;
    test.write_file("db/orders/open.sql", "select * from orders where open")?;

    let mut cmd = test.process_command();
    cmd.args([
        "--manifest",
        "declarations.json",
        "--resource-root",
        "db",
        "--output-root",
        "out",
        "--flavor",
        "jdbc",
    ]);
    assert_cmd_snapshot!(cmd);

    assert_eq!(
        test.read_file("out/META-INF/jdbc-named-queries.properties")?,
        "#generated by namedsql\norders/open.sql=select * from orders where open\n"
    );
    assert!(!test.exists("out/META-INF/jpa-named-queries.properties"));

    Ok(())
}

#[test]
fn test_invalid_manifest_is_internal_error() -> Result<()> {
    let test = CliTest::with_file("declarations.json", "{ \"elements\": 42 }")?;

    let mut cmd = test.process_command();
    cmd.args(["--manifest", "declarations.json"]);
    assert_cmd_snapshot!(cmd);

    Ok(())
}

#[test]
fn test_custom_suffix() -> Result<()> {
    let test = CliTest::with_file(
        "src/main/java/Repo.java",
        r#"import org.springframework.data.jdbc.repository.query.Query;

class Repo {
    @Query(name = "missing.sql")
    void a();

    @Query(name = "missing.query")
    void b();
}
"#,
    )?;

    let mut cmd = test.process_command();
    cmd.args(["--suffix", ".query"]);
    assert_cmd_snapshot!(cmd);

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command());

    Ok(())
}
