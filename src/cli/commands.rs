//! Command dispatch: settings resolution and one handler per subcommand

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::menu::{Menu, CHART_FOOTER, CHART_HEADER};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let container = ServiceContainer::new(load_settings(cli)?);
    match &cli.command {
        None | Some(Commands::Menu) => cmd_menu(&container),
        Some(Commands::Show { tree }) => cmd_show(&container, *tree),
        Some(Commands::Budget) => cmd_budget(&container),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

/// Layered settings with command line flags applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(company) = &cli.company {
        if company.trim().is_empty() {
            return Err(CliError::InvalidArgs("company name must not be empty".into()));
        }
        settings.company_name = company.clone();
    }
    if let Some(file) = &cli.file {
        settings.data_file = file.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(container))]
fn cmd_menu(container: &ServiceContainer) -> CliResult<()> {
    let service = container.new_chart_service();
    let stdin = io::stdin();
    let mut menu = Menu::new(
        service,
        &container.settings.data_file,
        stdin.lock(),
        io::stdout(),
    );
    menu.run()?;
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, tree: bool) -> CliResult<()> {
    let service = container.open_chart_service()?;
    if tree {
        output::info(&service.chart().to_tree());
    } else {
        output::header(CHART_HEADER.trim());
        print!("{}", service.chart().display());
        output::header(CHART_FOOTER.trim());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_budget(container: &ServiceContainer) -> CliResult<()> {
    let service = container.open_chart_service()?;
    output::action(
        "Total Salary Budget",
        &format!("${}", service.chart().total_budget()),
    );
    Ok(())
}

#[instrument(skip(container))]
fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::error("no config directory available on this platform"),
        },
    }
    Ok(())
}
