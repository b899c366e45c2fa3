use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta::internals::SettingsBindDropGuard;
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod init;
mod process;

const BIN_NAME: &str = "namedsql";

pub const JPA_STORE: &str = "target/classes/META-INF/jpa-named-queries.properties";
pub const JDBC_STORE: &str = "target/classes/META-INF/jdbc-named-queries.properties";

pub struct CliTest {
    _temp_dir: TempDir,
    _settings_scope: SettingsBindDropGuard,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop the config lookup at the project root
        fs::create_dir(project_dir.join(".git"))?;

        // Snapshots must not depend on where the temp dir was created
        let mut settings = insta::Settings::clone_current();
        for dir in [project_dir.as_path(), temp_dir.path()] {
            settings.add_filter(&regex::escape(&dir.to_string_lossy()), "[TEMP_DIR]");
        }
        let settings_scope = settings.bind_to_scope();

        Ok(Self {
            _temp_dir: temp_dir,
            _settings_scope: settings_scope,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn process_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("process");
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.project_dir.join(path).exists()
    }
}

/// A JPA repository referencing `sql/person/*.sql` plus one named query.
pub const PERSON_REPOSITORY: &str = r#"package io.example;

import java.util.List;

import org.springframework.data.domain.Page;
import org.springframework.data.domain.Pageable;
import org.springframework.data.jpa.repository.Query;

public interface PersonRepository extends JpaRepository<Person, Long> {

    @Query(name = "sql/person/all.sql", countName = "sql/person/count.sql", nativeQuery = true)
    Page<Person> all(Pageable pageable);

    @Query(name = "Person.findByLastname")
    List<Person> findByLastname(String lastname);
}
"#;

pub fn person_project() -> Result<CliTest> {
    let test = CliTest::with_file(
        "src/main/java/io/example/PersonRepository.java",
        PERSON_REPOSITORY,
    )?;
    test.write_file(
        "src/main/resources/sql/person/all.sql",
        "select *\n  from person",
    )?;
    test.write_file(
        "src/main/resources/sql/person/count.sql",
        "select count(*) from person",
    )?;
    Ok(test)
}
