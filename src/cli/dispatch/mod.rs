use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(
        matches
            .get_one::<String>("api-url")
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("missing required argument: --api-url"))?,
        matches
            .get_one::<String>("session-file")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("missing required argument: --session-file"))?,
    );

    // Closure to return a required string argument of a subcommand
    let required = |sub_m: &clap::ArgMatches, name: &str| -> Result<String> {
        sub_m
            .get_one::<String>(name)
            .map(ToString::to_string)
            .with_context(|| format!("missing required argument: {name}"))
    };

    let action = match matches.subcommand() {
        Some(("navigate", sub_m)) => Action::Navigate {
            path: required(sub_m, "path")?,
        },
        Some(("request", sub_m)) => Action::Request {
            method: required(sub_m, "method")?,
            path: required(sub_m, "path")?,
            body: sub_m.get_one::<String>("body").map(ToString::to_string),
        },
        Some(("login", sub_m)) => Action::Login {
            email: required(sub_m, "email")?,
            password: SecretString::from(required(sub_m, "password")?),
        },
        Some(("logout", _)) => Action::Logout,
        Some(("whoami", _)) => Action::Whoami,
        Some((other, _)) => return Err(anyhow!("unknown command: {other}")),
        None => return Err(anyhow!("no command given")),
    };

    Ok((action, globals))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn parse(args: Vec<&str>) -> (Action, GlobalArgs) {
        temp_env::with_vars(
            [
                ("STOCKPATH_API_URL", None::<String>),
                ("STOCKPATH_SESSION_FILE", None::<String>),
                ("STOCKPATH_EMAIL", None::<String>),
                ("STOCKPATH_PASSWORD", None::<String>),
            ],
            || handler(&commands::new().get_matches_from(args)).unwrap(),
        )
    }

    #[test]
    fn test_navigate() {
        let (action, globals) = parse(vec!["stockpath", "navigate", "/product-list"]);
        assert!(matches!(action, Action::Navigate { ref path } if path == "/product-list"));
        assert_eq!(globals.api_url, "http://localhost:8000");
        assert_eq!(globals.session_file, PathBuf::from(".stockpath/session.json"));
    }

    #[test]
    fn test_request() {
        let (action, _) = parse(vec![
            "stockpath",
            "--api-url",
            "https://erp.example.com",
            "request",
            "delete",
            "/api/products/7",
        ]);
        match action {
            Action::Request { method, path, body } => {
                assert_eq!(method, "DELETE");
                assert_eq!(path, "/api/products/7");
                assert_eq!(body, None);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_login() {
        let (action, _) = parse(vec![
            "stockpath",
            "login",
            "--email",
            "m@example.com",
            "--password",
            "secret-pass",
        ]);
        match action {
            Action::Login { email, password } => {
                assert_eq!(email, "m@example.com");
                assert_eq!(password.expose_secret(), "secret-pass");
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_logout_and_whoami() {
        assert!(matches!(parse(vec!["stockpath", "logout"]).0, Action::Logout));
        assert!(matches!(parse(vec!["stockpath", "whoami"]).0, Action::Whoami));
    }
}
