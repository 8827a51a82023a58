use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::{Path, PathBuf};

use warden_config::{Scope, SessionConfig, SessionStore};
use warden_core::{Mode, Result, WardenError};

/// Load the session at `root`, or walk the operator through creating one.
pub fn load_or_init(root: &Path) -> Result<SessionStore> {
    if SessionStore::exists(root) {
        return SessionStore::load(root);
    }
    init_wizard(root)
}

/// Interactive session wizard: authorization, mode, kill switch, scope.
pub fn init_wizard(root: &Path) -> Result<SessionStore> {
    let theme = ColorfulTheme::default();

    println!();
    println!("{}", style("Warden session setup").bold());
    println!("   One session = one engagement: one scope, one mode, one output root.\n");

    let authorization_doc: String = Input::with_theme(&theme)
        .with_prompt("Authorization statement (short text or link)")
        .default("AUTHORIZED TEST (demo)".into())
        .interact_text()
        .map_err(wizard_err)?;

    let mode_idx = Select::with_theme(&theme)
        .with_prompt("Session mode")
        .items(&Mode::ALL.map(|m| format!("{m} — {}", mode_hint(m))))
        .default(2)
        .interact()
        .map_err(wizard_err)?;
    let mode = Mode::ALL[mode_idx];

    let kill_switch: String = Input::with_theme(&theme)
        .with_prompt("Kill-switch phrase")
        .default("ABORT WARDEN NOW".into())
        .interact_text()
        .map_err(wizard_err)?;

    let domains: String = Input::with_theme(&theme)
        .with_prompt("In-scope domains (comma separated)")
        .allow_empty(true)
        .interact_text()
        .map_err(wizard_err)?;
    let hosts: String = Input::with_theme(&theme)
        .with_prompt("In-scope hosts/IPs (comma separated)")
        .allow_empty(true)
        .interact_text()
        .map_err(wizard_err)?;
    let paths: String = Input::with_theme(&theme)
        .with_prompt("Allowed local path roots (comma separated)")
        .default(".".into())
        .interact_text()
        .map_err(wizard_err)?;
    let out_of_scope: String = Input::with_theme(&theme)
        .with_prompt("Explicitly out-of-scope targets (comma separated)")
        .allow_empty(true)
        .interact_text()
        .map_err(wizard_err)?;

    let config = SessionConfig {
        authorization_doc,
        scope: Scope {
            cidrs: Vec::new(),
            domains: split_csv(&domains),
            hosts: split_csv(&hosts),
            paths: split_csv(&paths).into_iter().map(PathBuf::from).collect(),
            out_of_scope: split_csv(&out_of_scope),
        },
        roe: Default::default(),
        mode,
        output_dir: root.to_path_buf(),
        kill_switch,
    };

    let store = SessionStore::create(config)?;
    println!(
        "\n{} {}",
        style("Session saved:").green(),
        store.root().join(warden_config::SESSION_FILE).display()
    );
    Ok(store)
}

fn mode_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::PlanOnly => "plan and record, never execute",
        Mode::ExecuteWithApproval => "every command needs approval",
        Mode::AutoReadonly => "auto-run low-risk read-only commands",
        Mode::Simulate => "dry run, nothing executes",
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn wizard_err(e: dialoguer::Error) -> WardenError {
    WardenError::Session(format!("setup wizard failed: {e}"))
}
