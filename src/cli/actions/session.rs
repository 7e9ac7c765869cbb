use crate::cli::actions::Console;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

pub async fn login(console: &Console, email: &str, password: &SecretString) -> Result<()> {
    let session = console.client.login(email, password.expose_secret()).await?;

    match session.role() {
        Some(role) => println!("logged in as {role}"),
        None => println!("logged in"),
    }

    let navigation = console.router.navigate("/login")?;
    println!("{}", navigation.location);

    Ok(())
}

pub fn logout(console: &Console) {
    console.client.logout();
    println!("logged out");
}

pub fn whoami(console: &Console) {
    let session = console.client.store().get();

    if !session.is_authenticated() {
        println!("not logged in");
        return;
    }

    match session.role() {
        Some(role) => println!("{role}"),
        None => println!("authenticated, no role"),
    }
}
