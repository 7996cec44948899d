pub mod actions;

use clap::{Arg, ArgMatches, Command};

/// Parse command line arguments and return ArgMatches.
pub fn parse_args() -> ArgMatches {
    build_command().get_matches()
}

pub(crate) fn build_command() -> Command {
    Command::new("obsdeck")
        .about("Control panel for astronomical observation equipment")
        .arg(
            Arg::new("tui")
                .long("tui")
                .short('t')
                .help("Force TUI mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-ports")
                .long("list-ports")
                .short('l')
                .help("List all available serial ports and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .help("Output one-shot results in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("send")
                .long("send")
                .help("Send a payload on PORT once and exit")
                .value_name("PORT")
                .conflicts_with_all(["listen", "list-ports"]),
        )
        .arg(
            Arg::new("payload")
                .long("payload")
                .help("Payload for --send: text, or hex with a 0x prefix")
                .value_name("DATA")
                .requires("send"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .help("Stream frames received on PORT to stdout until Ctrl-C")
                .value_name("PORT")
                .conflicts_with("list-ports"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use in-memory simulators instead of real hardware")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("baud")
                .long("baud")
                .help("Baud rate override")
                .value_name("RATE"),
        )
        .arg(
            Arg::new("data-bits")
                .long("data-bits")
                .help("Data bits override (5-8)")
                .value_name("BITS"),
        )
        .arg(
            Arg::new("stop-bits")
                .long("stop-bits")
                .help("Stop bits override (1-2)")
                .value_name("BITS"),
        )
        .arg(
            Arg::new("parity")
                .long("parity")
                .help("Parity override: None, Odd, Even")
                .value_name("PARITY"),
        )
        .arg(
            Arg::new("no-config-cache")
                .long("no-config-cache")
                .help("Skip loading and saving the panel configuration file")
                .action(clap::ArgAction::SetTrue),
        )
}
