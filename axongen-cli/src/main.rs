use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use axongen_codegen::PackageGenerator;
use axongen_spec::loader;
use axongen_spec::parser_registry::ParserRegistry;
use axongen_spec::resolver::ModuleResolver;
use axongen_spec::{GenErrorKind, Severity};
use axongen_valid::validator;

#[derive(Parser)]
#[command(name = "axongen", about = "axongen – build-time code generator for Axon DI + HTTP routing")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a minimal annotated project (module manifest + one package fixture)
    Init {
        /// Module identifier, e.g. "example.com/app"
        module: String,
        /// Target directory (defaults to ./<last path segment of module>)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Validate every package's metadata against schema + cross-reference rules
    Validate {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show a summary of a project's packages without generating anything
    Check {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Generate one autogen_module.go per package, plus the root aggregation file
    Generate {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Root package name for the aggregation file (skip aggregation if absent)
        #[arg(long)]
        root_package: Option<String>,
        /// Where to write the root aggregation file (defaults to "<path>/autogen_module.go")
        #[arg(long)]
        root_output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init { module, dir } => cmd_init(&module, dir.as_deref()),
        Command::Validate { path } => cmd_validate(&path),
        Command::Check { path } => cmd_check(&path),
        Command::Generate {
            path,
            root_package,
            root_output,
        } => cmd_generate(&path, root_package.as_deref(), root_output.as_deref()),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn cmd_init(module: &str, dir: Option<&Path>) -> Result<bool> {
    if module.is_empty() {
        anyhow::bail!("module identifier must not be empty");
    }

    let project_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => {
            let last = module.rsplit('/').next().unwrap_or(module);
            validate_default_dir_name(last)?;
            PathBuf::from(last)
        }
    };

    if project_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", project_dir.display());
    }

    std::fs::create_dir_all(project_dir.join("pkg/user"))
        .with_context(|| format!("Failed to create directory '{}'", project_dir.display()))?;

    let manifest = serde_json::json!({ "module_identifier": module });
    std::fs::write(
        project_dir.join("axon.module.json"),
        serde_json::to_string_pretty(&manifest)? + "\n",
    )?;

    // A minimal package: one zero-dependency core service, so a fresh
    // project generates something non-trivial on the first run.
    let package = serde_json::json!({
        "package_name": "user",
        "package_dir": "pkg/user",
        "module_path": format!("{module}/pkg/user"),
        "controllers": [],
        "middlewares": [],
        "core_services": [{
            "base": { "name": "UserService", "struct_name": "UserService", "dependencies": [] },
            "service_mode": "Singleton",
            "lifecycle": { "has_start": false, "has_stop": false, "start_mode": "Same" },
            "manual": { "module_name": "" },
            "constructor": null,
        }],
        "loggers": [],
        "interfaces": [],
        "route_parsers": [],
    });
    std::fs::write(
        project_dir.join("pkg/user/package.meta.json"),
        serde_json::to_string_pretty(&package)? + "\n",
    )?;

    println!(
        "{} Created project '{}' at {}",
        "✓".green().bold(),
        module.bold(),
        project_dir.display()
    );
    println!("  {} axon.module.json", "→".dimmed());
    println!("  {} pkg/user/package.meta.json", "→".dimmed());
    println!();
    println!("Next steps:");
    println!("  {} {}", "cd".dimmed(), project_dir.display());
    println!("  {} validate", "axongen".dimmed());
    println!("  {} generate", "axongen".dimmed());

    Ok(true)
}

fn validate_default_dir_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Directory name must not be empty");
    }
    if name.contains('/') || name.contains('\\') {
        anyhow::bail!("Directory name must not contain path separators");
    }
    let mut components = Path::new(name).components();
    let Some(first) = components.next() else {
        anyhow::bail!("Directory name must not be empty");
    };
    if components.next().is_some() {
        anyhow::bail!("Directory name must be a single path component");
    }
    match first {
        std::path::Component::Normal(_) => Ok(()),
        _ => anyhow::bail!("Directory name must be a normal directory name"),
    }
}

/// Builds the parser registry every package in the project validates/generates
/// against: built-ins plus every `RouteParserMetadata` the packages declare
/// themselves (spec.md §5: "populated before any package is generated and
/// read-only thereafter").
fn project_parsers(packages: &[axongen_spec::meta::PackageMetadata]) -> (ParserRegistry, Vec<String>) {
    let mut registry = ParserRegistry::with_builtins();
    let mut conflicts = Vec::new();
    for package in packages {
        for parser in &package.route_parsers {
            if let Err(e) = registry.register(parser.clone()) {
                conflicts.push(e.to_string());
            }
        }
    }
    (registry, conflicts)
}

fn cmd_validate(path: &Path) -> Result<bool> {
    println!(
        "{} {}",
        "Validating".bold(),
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf()).display()
    );

    let project =
        loader::load_project(path).with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    let (parsers, parser_conflicts) = project_parsers(&project.packages);

    let mut error_count = project.errors.len();
    let mut warning_count = 0;

    for err in &project.errors {
        println!(
            "  {} [{}] {} ({})",
            "error".red().bold(),
            err.kind.code().dimmed(),
            err.message,
            err.location,
        );
    }
    for conflict in &parser_conflicts {
        error_count += 1;
        println!("  {} [{}] {}", "error".red().bold(), "E_PARSER_CONFLICT".dimmed(), conflict);
    }

    for package in &project.packages {
        let report = validator::validate_package(package, &parsers);
        for diagnostic in &report.diagnostics {
            let (label, is_error) = match diagnostic.severity {
                Severity::Error => ("error".red().bold(), true),
                Severity::Warning => ("warning".yellow().bold(), false),
                Severity::Info => ("info".blue().bold(), false),
            };
            println!(
                "  {} [{}] {} ({})",
                label,
                diagnostic.code.dimmed(),
                diagnostic.message,
                diagnostic.location,
            );
            if let Some(suggestion) = &diagnostic.suggestion {
                println!("    {} {}", "hint:".cyan(), suggestion);
            }
            if is_error {
                error_count += 1;
            } else {
                warning_count += 1;
            }
        }
    }

    println!();
    if error_count == 0 && warning_count == 0 {
        println!(
            "{} Project is valid ({} package(s))",
            "✓".green().bold(),
            project.packages.len()
        );
        Ok(true)
    } else if error_count == 0 {
        println!("{} Valid with {} warning(s)", "⚠".yellow().bold(), warning_count);
        Ok(true)
    } else {
        println!("{} {} error(s), {} warning(s)", "✗".red().bold(), error_count, warning_count);
        Ok(false)
    }
}

fn cmd_check(path: &Path) -> Result<bool> {
    let project =
        loader::load_project(path).with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    println!("{}", "Project Info".bold().underline());
    println!("  Module:    {}", project.manifest.module_identifier);
    println!("  Packages:  {}", project.packages.len());

    println!();
    println!("{}", "Packages".bold().underline());
    for package in &project.packages {
        println!(
            "  {:<20} controllers={:<3} middlewares={:<3} services={:<3} loggers={:<3} interfaces={:<3} parsers={}",
            package.package_name,
            package.controllers.len(),
            package.middlewares.len(),
            package.core_services.len(),
            package.loggers.len(),
            package.interfaces.len(),
            package.route_parsers.len(),
        );
    }

    let (parsers, parser_conflicts) = project_parsers(&project.packages);
    let mut error_count = project.errors.len() + parser_conflicts.len();
    for package in &project.packages {
        error_count += validator::validate_package(package, &parsers).errors().count();
    }

    println!();
    if error_count > 0 {
        println!("{} {} validation error(s) found", "✗".red().bold(), error_count);
        Ok(false)
    } else {
        println!("{} No validation errors", "✓".green().bold());
        Ok(true)
    }
}

fn cmd_generate(path: &Path, root_package: Option<&str>, root_output: Option<&Path>) -> Result<bool> {
    println!(
        "{} {}",
        "Generating code from".bold(),
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf()).display()
    );

    let project =
        loader::load_project(path).with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    if !project.errors.is_empty() {
        eprintln!(
            "{} {} package(s) failed to load — fix them before generating code",
            "✗".red().bold(),
            project.errors.len()
        );
        for err in &project.errors {
            eprintln!("  {} {}", "error:".red().bold(), err);
        }
        return Ok(false);
    }

    let (parsers, parser_conflicts) = project_parsers(&project.packages);
    if !parser_conflicts.is_empty() {
        eprintln!("{} parser registry conflicts — fix them before generating code", "✗".red().bold());
        for conflict in &parser_conflicts {
            eprintln!("  {} {}", "error:".red().bold(), conflict);
        }
        return Ok(false);
    }

    let resolver = ModuleResolver::new(path, project.manifest.clone());
    let generator = PackageGenerator::new(&parsers);

    let mut generated_files = 0usize;
    let mut failed_packages = 0usize;
    let mut sub_modules = Vec::new();

    for package in &project.packages {
        let report = validator::validate_package(package, &parsers);
        if !report.ok() {
            failed_packages += 1;
            eprintln!(
                "{} package '{}' has {} validation error(s), skipping",
                "✗".red().bold(),
                package.package_name,
                report.errors().count()
            );
            for diagnostic in report.errors() {
                eprintln!("    {} {}", "error:".red().bold(), diagnostic.message);
            }
            continue;
        }

        match generator.generate(package) {
            Ok(text) => {
                let out_path = loader::autogen_module_path(path, package, "go");
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
                }
                std::fs::write(&out_path, &text)
                    .with_context(|| format!("Failed to write '{}'", out_path.display()))?;
                println!("  {} {}", "→".dimmed(), out_path.display());
                generated_files += 1;

                if !package.is_empty() {
                    let import_path = resolver.build_package_path(Path::new(&package.package_dir))?;
                    sub_modules.push(axongen_codegen::SubModule::new(
                        package.package_name.clone(),
                        import_path,
                        "Module",
                    ));
                }
            }
            Err(err) => {
                failed_packages += 1;
                eprintln!(
                    "{} package '{}' failed to generate: {err}",
                    "✗".red().bold(),
                    package.package_name
                );
            }
        }
    }

    if let Some(root_name) = root_package {
        if sub_modules.is_empty() {
            eprintln!(
                "{} root aggregation requested but no package produced a module",
                "⚠".yellow().bold()
            );
        } else {
            match axongen_codegen::generate_root_module(root_name, &sub_modules) {
                Ok(text) => {
                    let out_path = root_output
                        .map(PathBuf::from)
                        .unwrap_or_else(|| path.join("autogen_module.go"));
                    std::fs::write(&out_path, &text)
                        .with_context(|| format!("Failed to write '{}'", out_path.display()))?;
                    println!("  {} {} (root)", "→".dimmed(), out_path.display());
                    generated_files += 1;
                }
                Err(err) if err.kind == GenErrorKind::Generation => {
                    eprintln!("{} root aggregation failed: {err}", "✗".red().bold());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    println!();
    if failed_packages > 0 {
        println!(
            "{} generated {} file(s), {} package(s) failed",
            "✗".red().bold(),
            generated_files,
            failed_packages
        );
        Ok(false)
    } else {
        println!("{} Generated {} file(s)", "✓".green().bold(), generated_files);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_rejects_parent_dir_name() {
        let result = cmd_init("..", None);
        assert!(result.is_err());
    }

    #[test]
    fn init_creates_minimal_project() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("app");

        cmd_init("example.com/app", Some(project_dir.as_path())).unwrap();

        assert!(project_dir.join("axon.module.json").exists());
        assert!(project_dir.join("pkg/user/package.meta.json").exists());
    }

    #[test]
    fn validate_accepts_freshly_initialized_project() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("app");
        cmd_init("example.com/app", Some(project_dir.as_path())).unwrap();

        let ok = cmd_validate(&project_dir).unwrap();
        assert!(ok);
    }

    #[test]
    fn generate_writes_autogen_module_for_freshly_initialized_project() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("app");
        cmd_init("example.com/app", Some(project_dir.as_path())).unwrap();

        let ok = cmd_generate(&project_dir, None, None).unwrap();
        assert!(ok);
        assert!(project_dir.join("pkg/user/autogen_module.go").exists());
    }

    #[test]
    fn generate_with_root_package_emits_aggregation_file() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("app");
        cmd_init("example.com/app", Some(project_dir.as_path())).unwrap();

        let ok = cmd_generate(&project_dir, Some("app"), None).unwrap();
        assert!(ok);
        assert!(project_dir.join("autogen_module.go").exists());
    }

    #[test]
    fn check_reports_package_counts() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("app");
        cmd_init("example.com/app", Some(project_dir.as_path())).unwrap();

        let ok = cmd_check(&project_dir).unwrap();
        assert!(ok);
    }
}
