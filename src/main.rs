use std::io::IsTerminal;

use obsdeck::{boot, cli};

fn main() -> anyhow::Result<()> {
    let matches = cli::parse_args();

    obsdeck::core::persistence::set_no_cache(matches.get_flag("no-config-cache"));

    let mode = if matches.get_flag("mock") {
        obsdeck::session::SessionMode::Mock
    } else {
        obsdeck::session::SessionMode::Hardware
    };

    // One-shot actions log to stderr-style plain env_logger; the TUI gets the
    // file logger so the alternate screen stays clean.
    if matches.get_flag("list-ports") {
        env_logger::init();
        cli::actions::list_ports(mode, matches.get_flag("json"));
        return Ok(());
    }

    if let Some(port) = matches.get_one::<String>("send") {
        env_logger::init();
        let payload = matches
            .get_one::<String>("payload")
            .map(|raw| cli::actions::parse_payload(raw))
            .transpose()?
            .unwrap_or_else(|| b"AT".to_vec());
        let cfg = cli::actions::config_from_matches(&matches)?;
        return cli::actions::send_once(port, &payload, cfg, mode);
    }

    if let Some(port) = matches.get_one::<String>("listen") {
        if let Ok(path) = std::env::var("OBSDECK_LOG_FILE") {
            boot::init_headless_logger(&path)?;
        } else {
            env_logger::init();
        }
        let cfg = cli::actions::config_from_matches(&matches)?;
        return cli::actions::listen(port, cfg, mode);
    }

    if matches.get_flag("tui") || std::io::stdout().is_terminal() {
        boot::init_common();
        obsdeck::tui::start(&matches)
    } else {
        env_logger::init();
        log::info!("stdout is not a terminal; use --tui to force the panel");
        cli::actions::list_ports(mode, matches.get_flag("json"));
        Ok(())
    }
}
