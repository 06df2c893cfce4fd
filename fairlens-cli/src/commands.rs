//! CLI subcommand handlers.

use crate::report;
use crate::{Commands, ConfigAction, RunArgs};
use fairlens_core::config::FairlensConfig;
use fairlens_core::views::{ComparisonView, DatasetView, MitigationView, ModelView};
use fairlens_core::wizard::{Command, Wizard};
use fairlens_core::{FairlensError, HttpFairnessClient, Metadata, PredictionKind, Step};
use std::path::Path;
use std::sync::Arc;

/// Handle a CLI subcommand against the configured service.
pub async fn handle_command(
    command: Commands,
    config: FairlensConfig,
    quiet: bool,
) -> anyhow::Result<()> {
    let client = HttpFairnessClient::new(&config.api)?;
    let mut wizard = Wizard::new(config, Arc::new(client));
    let mut out = Output { quiet };

    match command {
        Commands::Health => {
            let result = execute(&mut wizard, &mut out, Command::CheckHealth).await;
            println!("API status: {}", wizard.session().api_status().label());
            result
        }
        Commands::Sample => {
            let result = wizard.write_sample().map(|_| ());
            out.flush_toasts(&mut wizard);
            Ok(result?)
        }
        Commands::UploadData { path } => upload_data(&mut wizard, &mut out, &path).await,
        Commands::SetMetadata {
            target,
            protected,
            features,
        } => {
            let metadata = Metadata {
                target,
                protected,
                features,
            };
            execute(&mut wizard, &mut out, Command::SubmitMetadata(metadata)).await
        }
        Commands::UploadModel { path } => upload_model(&mut wizard, &mut out, &path).await,
        Commands::Analyze => analyze(&mut wizard, &mut out).await,
        Commands::Mitigate {
            technique,
            attribute,
        } => mitigate(&mut wizard, &mut out, technique, attribute).await,
        Commands::Compare => compare(&mut wizard, &mut out).await,
        Commands::DownloadPredictions { kind } => {
            execute(&mut wizard, &mut out, Command::DownloadPredictions(kind)).await
        }
        Commands::ModelCard => execute(&mut wizard, &mut out, Command::DownloadModelCard).await,
        Commands::Run(args) => run_pipeline(&mut wizard, &mut out, args).await,
        Commands::Config { .. } => anyhow::bail!("config commands do not contact the service"),
    }
}

/// Handle `config init` / `config show`.
pub fn handle_config(
    action: &ConfigAction,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = fairlens_core::config::workspace_config_path(workspace);
            if path.exists() {
                println!("Configuration file already exists at: {}", path.display());
                return Ok(());
            }
            let path = fairlens_core::config::write_default_config(workspace)?;
            println!("Created default configuration at: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = fairlens_core::config::load_config(Some(workspace), config_file)
                .map_err(FairlensError::from)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

/// Where toasts go in scripted mode.
struct Output {
    quiet: bool,
}

impl Output {
    /// Print and clear accumulated toasts. Errors are always shown.
    fn flush_toasts(&mut self, wizard: &mut Wizard) {
        for toast in wizard.toasts().toasts() {
            if !self.quiet || toast.kind == fairlens_core::ToastKind::Error {
                eprintln!("{}", report::toast_line(toast));
            }
        }
        wizard.toasts_mut().clear();
    }

    fn section(&self, title: &str, lines: Vec<String>) {
        println!("== {} ==", title);
        for line in lines {
            println!("{}", line);
        }
    }
}

async fn execute(wizard: &mut Wizard, out: &mut Output, command: Command) -> anyhow::Result<()> {
    let result = wizard.run(command).await;
    out.flush_toasts(wizard);
    Ok(result?)
}

async fn upload_data(wizard: &mut Wizard, out: &mut Output, path: &Path) -> anyhow::Result<()> {
    execute(
        wizard,
        out,
        Command::UploadDataset {
            path: Some(path.to_path_buf()),
        },
    )
    .await?;
    if let Some(summary) = wizard.session().dataset() {
        out.section("Dataset", report::dataset_lines(&DatasetView::new(summary)));
    }
    Ok(())
}

async fn upload_model(wizard: &mut Wizard, out: &mut Output, path: &Path) -> anyhow::Result<()> {
    execute(
        wizard,
        out,
        Command::UploadModel {
            path: Some(path.to_path_buf()),
        },
    )
    .await?;
    if let Some(summary) = wizard.session().model() {
        out.section("Model", report::model_lines(&ModelView::new(summary)));
    }
    Ok(())
}

async fn analyze(wizard: &mut Wizard, out: &mut Output) -> anyhow::Result<()> {
    execute(wizard, out, Command::AnalyzeBias).await?;
    if let Some(view) = wizard.session().analysis() {
        out.section("Bias Analysis", report::analysis_lines(view));
    }
    Ok(())
}

async fn mitigate(
    wizard: &mut Wizard,
    out: &mut Output,
    technique: String,
    attribute: String,
) -> anyhow::Result<()> {
    execute(
        wizard,
        out,
        Command::ApplyMitigation {
            technique: Some(technique),
            protected_attribute: Some(attribute),
        },
    )
    .await?;
    if let Some(result) = wizard.session().mitigation() {
        out.section("Mitigation", report::mitigation_lines(&MitigationView::new(result)));
    }
    Ok(())
}

async fn compare(wizard: &mut Wizard, out: &mut Output) -> anyhow::Result<()> {
    execute(wizard, out, Command::CompareModels).await?;
    if let Some(result) = wizard.session().comparison() {
        out.section("Model Comparison", report::comparison_lines(&ComparisonView::new(result)));
    }
    Ok(())
}

/// Every step in order, stopping at the first failure.
async fn run_pipeline(wizard: &mut Wizard, out: &mut Output, args: RunArgs) -> anyhow::Result<()> {
    let attribute = args
        .attribute
        .clone()
        .or_else(|| args.protected.first().cloned())
        .unwrap_or_default();

    execute(wizard, out, Command::CheckHealth).await?;
    upload_data(wizard, out, &args.data).await?;
    wizard.go_to(Step::Metadata);
    execute(
        wizard,
        out,
        Command::SubmitMetadata(Metadata {
            target: args.target,
            protected: args.protected,
            features: args.features,
        }),
    )
    .await?;
    upload_model(wizard, out, &args.model).await?;
    wizard.go_to(Step::AnalyzeBias);
    analyze(wizard, out).await?;
    wizard.go_to(Step::Mitigate);
    mitigate(wizard, out, args.technique, attribute).await?;
    wizard.go_to(Step::Compare);
    compare(wizard, out).await?;

    if args.download {
        for kind in [PredictionKind::Biased, PredictionKind::Fair] {
            execute(wizard, out, Command::DownloadPredictions(kind)).await?;
        }
        execute(wizard, out, Command::DownloadModelCard).await?;
    }
    wizard.finish();
    out.flush_toasts(wizard);
    Ok(())
}
