use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        DeclaredElement, Diagnostics, QueryFlavor,
        discover::{discover_sources, load_manifest},
        merge::{MergeOutcome, PropertiesMerge},
        policy::ExtractionPolicy,
        resolver::ResourceNamespace,
        scanner::scan_declarations,
    },
};

/// How far a run goes for each flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Resolve, merge and write the properties files.
    Process,
    /// Stop after the extraction policy; no store is read or written.
    Check,
}

/// What one flavor's pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorSummary {
    pub flavor: QueryFlavor,
    /// Elements carrying the flavor's annotation.
    pub declaration_count: usize,
    /// Entries staged from resolved resources.
    pub resolved_count: usize,
    /// Values left as plain query names.
    pub plain_reference_count: usize,
    /// `None` in check mode.
    pub outcome: Option<MergeOutcome>,
}

/// Everything a run produced. The run failed iff `diagnostics` holds an error.
#[derive(Debug)]
pub struct RunReport {
    pub summaries: Vec<FlavorSummary>,
    pub diagnostics: Diagnostics,
}

/// Configured pipeline for one invocation.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g. `--output-root target/classes`)
/// 2. `.namedsqlrc.json` config file
/// 3. Built-in defaults
///
/// Relative paths are resolved against the source root.
pub struct ProcessContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// Declared elements from the manifest or the source scan.
    pub elements: Vec<DeclaredElement>,

    /// Number of Java files scanned; 0 when a manifest was used.
    pub source_files: usize,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    output_root: PathBuf,
    namespace: ResourceNamespace,
}

impl ProcessContext {
    /// Load configuration, apply CLI overrides and discover declarations.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The source root does not exist
    /// - Config file is invalid
    /// - The manifest cannot be read or parsed
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if !root_dir.is_dir() {
            bail!("Source root does not exist: {}", root_dir.display());
        }

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        apply_overrides(&mut config, common_args);
        config.validate().context("Invalid command line options")?;

        let output_root = resolve_path(&root_dir, &config.output_root);
        let mut roots = vec![output_root.clone()];
        roots.extend(
            config
                .resource_roots
                .iter()
                .map(|root| resolve_path(&root_dir, root)),
        );
        let namespace = ResourceNamespace::new(roots);

        let (elements, source_files) = match &config.manifest {
            Some(manifest) => (load_manifest(&resolve_path(&root_dir, manifest))?, 0),
            None => {
                let discovered = discover_sources(
                    &root_dir,
                    &config.includes,
                    &config.ignores,
                    &config.flavors,
                    verbose,
                );
                (discovered.elements, discovered.files_scanned)
            }
        };

        Ok(Self {
            config,
            root_dir,
            elements,
            source_files,
            verbose,
            output_root,
            namespace,
        })
    }

    /// One scan → policy → merge pass per configured flavor.
    ///
    /// Never stops early: every flavor and every declaration is evaluated and
    /// all problems end up in the report.
    pub fn run(&self, mode: RunMode) -> RunReport {
        let mut diagnostics = Diagnostics::new();
        let summaries = self
            .config
            .flavors
            .iter()
            .map(|&flavor| self.run_flavor(flavor, mode, &mut diagnostics))
            .collect();

        RunReport {
            summaries,
            diagnostics,
        }
    }

    fn run_flavor(
        &self,
        flavor: QueryFlavor,
        mode: RunMode,
        diagnostics: &mut Diagnostics,
    ) -> FlavorSummary {
        let declarations = scan_declarations(
            flavor.annotation_type(),
            flavor.parameter_names(),
            &self.elements,
        );

        let policy = ExtractionPolicy::new(&self.namespace, &self.config.resource_suffix);
        let extracted = policy.apply(&declarations, diagnostics);

        if self.verbose {
            for name in &extracted.plain_references {
                eprintln!("Note: [{}] '{}' left as a named query", flavor, name);
            }
        }

        let outcome = match mode {
            RunMode::Check => None,
            RunMode::Process => Some(
                PropertiesMerge::new(&self.namespace, &self.output_root, flavor.output_path())
                    .merge(&extracted.entries, diagnostics),
            ),
        };

        FlavorSummary {
            flavor,
            declaration_count: extracted.declaration_count,
            resolved_count: extracted.entries.len(),
            plain_reference_count: extracted.plain_references.len(),
            outcome,
        }
    }
}

fn apply_overrides(config: &mut Config, args: &CommonArgs) {
    if let Some(ref output_root) = args.output_root {
        config.output_root = output_root.to_string_lossy().to_string();
    }

    if !args.resource_root.is_empty() {
        config.resource_roots = args
            .resource_root
            .iter()
            .map(|root| root.to_string_lossy().to_string())
            .collect();
    }

    if let Some(ref manifest) = args.manifest {
        config.manifest = Some(manifest.to_string_lossy().to_string());
    }

    if !args.flavor.is_empty() {
        config.flavors = args.flavor.clone();
    }
    config.flavors.sort();
    config.flavors.dedup();

    if let Some(ref suffix) = args.suffix {
        config.resource_suffix = suffix.clone();
    }
}

fn resolve_path(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
