//! Subcommand execution

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use cfgmig_core::{MigratedConfig, Migrator};
use cfgmig_schema::{ConfigDocument, DocumentFormat, OptionRegistry};
use clap::ArgMatches;

/// Inputs common to `migrate` and `check`
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub path: PathBuf,
    pub options: Option<PathBuf>,
    pub max_depth: Option<usize>,
}

impl InputOptions {
    fn from_matches(args: &ArgMatches) -> Result<Self> {
        let path = args
            .get_one::<PathBuf>("path")
            .cloned()
            .context("missing configuration path")?;
        Ok(Self {
            path,
            options: args.get_one::<PathBuf>("options").cloned(),
            max_depth: args.get_one::<usize>("max-depth").copied(),
        })
    }

    /// Migrator for these options
    ///
    /// # Errors
    /// Returns error if the option definitions cannot be read
    pub fn migrator(&self) -> Result<Migrator> {
        let registry = match &self.options {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read option definitions {}", path.display()))?;
                OptionRegistry::from_json(&text)
                    .with_context(|| format!("invalid option definitions in {}", path.display()))?
            }
            None => OptionRegistry::with_defaults(),
        };
        tracing::debug!(options = registry.len(), "option registry loaded");

        let migrator = Migrator::new(registry);
        Ok(match self.max_depth {
            Some(limit) => migrator.with_max_depth(limit),
            None => migrator,
        })
    }

    /// Read and parse the input file
    ///
    /// # Errors
    /// Returns error if the file is unreadable or does not parse
    pub fn load(&self) -> Result<(ConfigDocument, DocumentFormat)> {
        let format = format_of(&self.path);
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let document = ConfigDocument::parse(&text, format)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok((document, format))
    }

    /// Load and migrate the input file
    ///
    /// # Errors
    /// Returns error if loading or migration fails
    pub fn migrate(&self) -> Result<(MigratedConfig, DocumentFormat)> {
        let migrator = self.migrator()?;
        let (document, format) = self.load()?;
        let result = migrator
            .migrate_with_parent(document.root(), cfgmig_core::ParentKey::Root)
            .with_context(|| format!("failed to migrate {}", self.path.display()))?;
        Ok((result, format))
    }
}

/// Format implied by a file name; JSON when unknown
fn format_of(path: &Path) -> DocumentFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
        .unwrap_or_default()
}

fn parse_format(name: &str) -> Result<DocumentFormat> {
    match name {
        "json" => Ok(DocumentFormat::Json),
        "yaml" => Ok(DocumentFormat::Yaml),
        other => bail!("unsupported format '{other}'"),
    }
}

/// Options for `migrate`
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub input: InputOptions,
    pub output: Option<PathBuf>,
    pub format: Option<DocumentFormat>,
}

impl MigrateOptions {
    fn from_matches(args: &ArgMatches) -> Result<Self> {
        let format = args
            .get_one::<String>("format")
            .map(String::as_str)
            .map(parse_format)
            .transpose()?;
        Ok(Self {
            input: InputOptions::from_matches(args)?,
            output: args.get_one::<PathBuf>("output").cloned(),
            format,
        })
    }
}

/// Migrate a file and render the result
///
/// Returns the rendered document and whether anything was migrated.
///
/// # Errors
/// Returns error if the input cannot be loaded, migrated or rendered
pub fn migrate(options: &MigrateOptions) -> Result<(String, bool)> {
    let (result, input_format) = options.input.migrate()?;
    let format = options.format.unwrap_or(input_format);
    let is_migrated = result.is_migrated;
    let rendered = ConfigDocument::new(result.config)
        .render(format)
        .context("failed to render migrated configuration")?;

    if is_migrated {
        tracing::info!(path = %options.input.path.display(), "configuration migrated");
    } else {
        tracing::info!(path = %options.input.path.display(), "configuration already current");
    }
    Ok((rendered, is_migrated))
}

/// Check whether a file uses legacy syntax
///
/// # Errors
/// Returns error if the input cannot be loaded or migrated
pub fn check(options: &InputOptions) -> Result<bool> {
    let (result, _) = options.migrate()?;
    Ok(result.is_migrated)
}

/// Dispatch parsed arguments
///
/// # Errors
/// Returns error if the selected subcommand fails
pub fn run(matches: &ArgMatches) -> Result<ExitCode> {
    match matches.subcommand() {
        Some(("migrate", args)) => {
            let options = MigrateOptions::from_matches(args)?;
            let (rendered, _) = migrate(&options)?;
            match &options.output {
                Some(path) => fs::write(path, ensure_trailing_newline(rendered))
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", ensure_trailing_newline(rendered)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", args)) => {
            let options = InputOptions::from_matches(args)?;
            if check(&options)? {
                println!("{}: uses legacy configuration syntax", options.path.display());
                Ok(ExitCode::from(1))
            } else {
                println!("{}: up to date", options.path.display());
                Ok(ExitCode::SUCCESS)
            }
        }
        Some((other, _)) => bail!("unknown subcommand '{other}'"),
        None => bail!("no subcommand given"),
    }
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
