use crate::output::{mask_secret, Output, OutputFormat};
use crate::ConfigCommands;
use arr_sync_config::{Config, LibraryConfig, SheetAuth};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, config_path: &Path, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(config_path, full, output),
        ConfigCommands::Validate => validate_config(config_path, output),
        ConfigCommands::Init { force } => init_config(config_path, force, output),
    }
}

fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Err(color_eyre::eyre::eyre!(
            "Configuration file not found at {}. Run 'arrsheets config init' to create one.",
            config_path.display()
        ));
    }

    Config::load_from_file(config_path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_path.display(), e))
}

/// Load the config file and reject it before any network work if incomplete
pub fn load_validated_config(config_path: &Path) -> Result<Config> {
    let config = load_config(config_path)?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {:#}", config_path.display(), e))?;
    Ok(config)
}

fn show_config(config_path: &Path, full: bool, output: &Output) -> Result<()> {
    let config = load_config(config_path)?;
    let secret = |s: &str| if full { s.to_string() } else { mask_secret(s) };

    let auth = match config.sheet_auth() {
        Ok(SheetAuth::ApiKey(key)) => format!("API key {} (read-only)", secret(&key)),
        Ok(SheetAuth::ServiceAccount(path)) => format!("Service account {}", path.display()),
        Err(e) => format!("{:#}", e),
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{} {}\n", "Configuration".bright_cyan().bold(), config_path.display().bright_black());

            let mut google = section_table("Google Sheets");
            google.add_row(vec![Cell::new("Spreadsheet ID"), Cell::new(&config.google.spreadsheet_id)]);
            google.add_row(vec![Cell::new("Range"), Cell::new(&config.google.spreadsheet_range)]);
            if let Ok(range) = config.sheet_range() {
                google.add_row(vec![Cell::new("Results written to"), Cell::new(range.output_range())]);
            }
            google.add_row(vec![Cell::new("Auth"), Cell::new(&auth)]);
            println!("{}\n", google);

            for (name, library) in [("Radarr", &config.radarr), ("Sonarr", &config.sonarr)] {
                println!("{}\n", library_table(name, library, full));
            }

            println!("{} {}s", "HTTP timeout:".bright_black(), config.http.timeout_secs);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_path.display().to_string(),
                "google": {
                    "spreadsheet_id": config.google.spreadsheet_id,
                    "spreadsheet_range": config.google.spreadsheet_range,
                    "output_range": config.sheet_range().ok().map(|r| r.output_range()),
                    "auth": auth,
                },
                "radarr": library_json(&config.radarr, full),
                "sonarr": library_json(&config.sonarr, full),
                "http": { "timeout_secs": config.http.timeout_secs },
            }));
        }
    }

    Ok(())
}

fn section_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn library_table(name: &str, library: &LibraryConfig, full: bool) -> Table {
    let api_key = if full { library.api_key.clone() } else { mask_secret(&library.api_key) };
    let mut table = section_table(name);
    table.add_row(vec![Cell::new("URL"), Cell::new(&library.url)]);
    table.add_row(vec![Cell::new("API Key"), Cell::new(api_key)]);
    table.add_row(vec![Cell::new("Quality Profile"), Cell::new(library.quality_profile)]);
    table.add_row(vec![Cell::new("Root Folder"), Cell::new(&library.root_folder_path)]);
    table
}

fn library_json(library: &LibraryConfig, full: bool) -> serde_json::Value {
    let api_key = if full { library.api_key.clone() } else { mask_secret(&library.api_key) };
    json!({
        "url": library.url,
        "api_key": api_key,
        "quality_profile": library.quality_profile,
        "root_folder_path": library.root_folder_path,
    })
}

fn validate_config(config_path: &Path, output: &Output) -> Result<()> {
    let config = load_validated_config(config_path)?;

    if config.sheet_auth().is_ok_and(|auth| !auth.can_write()) {
        output.warn("An API key only allows reading the sheet; results will not be written back");
    }

    match output.format() {
        OutputFormat::Human => output.success(format!("{} is valid", config_path.display())),
        OutputFormat::Json | OutputFormat::JsonPretty => output.json(&json!({
            "valid": true,
            "config_file": config_path.display().to_string(),
        })),
    }
    Ok(())
}

fn init_config(config_path: &Path, force: bool, output: &Output) -> Result<()> {
    if config_path.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        ));
    }

    Config::template()
        .save_to_file(config_path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_path.display(), e))?;

    output.success(format!("Configuration template written to {}", config_path.display()));
    output.info("Fill in spreadsheet_id, the service account key and the Radarr/Sonarr API keys, then run 'arrsheets config validate'.");
    Ok(())
}
