use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn validator_method() -> ValueParser {
    ValueParser::from(move |method: &str| -> std::result::Result<String, String> {
        let upper = method.to_uppercase();
        match upper.as_str() {
            "GET" | "POST" | "PUT" | "PATCH" | "DELETE" => Ok(upper),
            _ => Err(format!("unsupported method: {method}")),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("stockpath")
        .about("Inventory and purchase-order console client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .short('u')
                .long("api-url")
                .help("Inventory API base URL")
                .default_value("http://localhost:8000")
                .env("STOCKPATH_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .short('s')
                .long("session-file")
                .help("File holding the stored session")
                .default_value(".stockpath/session.json")
                .env("STOCKPATH_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("STOCKPATH_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("navigate")
                .about("Resolve a page against the stored session")
                .arg(Arg::new("path").help("Page path, example: /product-list").required(true)),
        )
        .subcommand(
            Command::new("request")
                .about("Send an authenticated API request")
                .arg(
                    Arg::new("method")
                        .help("HTTP method")
                        .required(true)
                        .value_parser(validator_method()),
                )
                .arg(Arg::new("path").help("API path, example: /api/products").required(true))
                .arg(
                    Arg::new("body")
                        .short('b')
                        .long("body")
                        .help("JSON request body"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and store the session")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .env("STOCKPATH_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("STOCKPATH_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Drop the stored session"))
        .subcommand(Command::new("whoami").about("Show the stored session role"))
}
