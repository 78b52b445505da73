use anyhow::{Result, bail};
use journey_api_client::ClientFactory;
use journey_client::{Controller, FlowState};

use crate::flow::{resume, surface};

/// Make sure a stored key is not silently replaced.
fn ensure_signed_out<F: ClientFactory>(ctl: &Controller<F>) -> Result<()> {
    if let Some(key) = ctl.state().key() {
        bail!(
            "already signed in with key {} (run `journey sign-out` first)",
            key.short()
        );
    }
    Ok(())
}

/// `journey new`: register a fresh key and store it locally.
pub async fn run_new<F: ClientFactory>(ctl: &mut Controller<F>) -> Result<()> {
    resume(ctl).await?;
    ensure_signed_out(ctl)?;

    let generated = ctl.generate_new_user().await;
    surface(ctl, generated)?;

    if let Some(key) = ctl.state().key() {
        println!("Your access key: {key}");
        println!("Save this key. It is the only way to sign back in.");
        println!();
        println!("Next: journey name <NAME>");
    }
    Ok(())
}

/// `journey sign-in <KEY>`
pub async fn run_sign_in<F: ClientFactory>(ctl: &mut Controller<F>, key: &str) -> Result<()> {
    resume(ctl).await?;
    ensure_signed_out(ctl)?;

    let signed_in = ctl.sign_in_with_key(key).await;
    surface(ctl, signed_in)?;

    match ctl.state() {
        FlowState::Active { name, .. } => {
            println!("Signed in as {name}.");
            if let Some(err) = ctl.error() {
                eprintln!("Warning: {err}");
            } else {
                println!("{} entries in your journal.", ctl.entries().len());
            }
        }
        FlowState::AwaitingName { .. } => {
            println!("Signed in. No name is set for this key yet.");
            println!("Next: journey name <NAME>");
        }
        FlowState::Welcome => {}
    }
    Ok(())
}

/// `journey name <NAME>`: finish onboarding for a freshly created key.
pub async fn run_name<F: ClientFactory>(ctl: &mut Controller<F>, name: &str) -> Result<()> {
    resume(ctl).await?;
    match ctl.state() {
        FlowState::Welcome => {
            bail!("not signed in (run `journey new` or `journey sign-in <KEY>`)")
        }
        FlowState::Active { name, .. } => bail!("this key already has a name ({name})"),
        FlowState::AwaitingName { .. } => {}
    }

    let submitted = ctl.submit_name_value(name).await;
    surface(ctl, submitted)?;

    if let FlowState::Active { name, .. } = ctl.state() {
        println!("Welcome, {name}.");
    }
    Ok(())
}

/// `journey whoami`
pub async fn run_whoami<F: ClientFactory>(ctl: &mut Controller<F>) -> Result<()> {
    resume(ctl).await?;
    match ctl.state() {
        FlowState::Welcome => println!("Not signed in."),
        FlowState::AwaitingName { key } => {
            println!("Key:  {key}");
            println!("Name: (not set, run `journey name <NAME>`)");
        }
        FlowState::Active { key, name } => {
            println!("Key:  {key}");
            println!("Name: {name}");
            match ctl.error() {
                Some(err) => eprintln!("Warning: {err}"),
                None => println!("Entries: {}", ctl.entries().len()),
            }
        }
    }
    Ok(())
}

/// `journey sign-out`: forget the key locally. `confirm` is asked only when
/// a key is actually stored.
pub async fn run_sign_out<F: ClientFactory>(
    ctl: &mut Controller<F>,
    confirm: impl FnOnce() -> Result<bool>,
) -> Result<()> {
    if let Err(e) = resume(ctl).await {
        eprintln!("Warning: {e:#}");
    }
    let Some(key) = ctl.session().key().cloned() else {
        println!("Not signed in.");
        return Ok(());
    };

    ctl.request_sign_out();
    if !confirm()? {
        ctl.cancel_sign_out();
        println!("Sign-out cancelled.");
        return Ok(());
    }
    let signed_out = ctl.confirm_sign_out();
    surface(ctl, signed_out)?;

    println!("Signed out. Key {} was removed from this device.", key.short());
    println!("Your entries stay on the server. Sign back in with: journey sign-in <KEY>");
    Ok(())
}

/// Interactive confirmation used by `journey sign-out`.
pub fn prompt_sign_out() -> Result<bool> {
    let confirmed = dialoguer::Confirm::new()
        .with_prompt("Sign out? You will need your key to sign back in")
        .default(false)
        .interact()?;
    Ok(confirmed)
}
