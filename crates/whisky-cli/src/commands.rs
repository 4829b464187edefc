//! Command handlers. Each returns the JSON document printed by `main`.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use whisky_kit::wine::WhiskyWineInstaller;
use whisky_kit::{Bottle, WinVersion};
use whisky_manager::registry::read_bottle;
use whisky_manager::BottleRegistry;

/// Everything the commands operate on, built once at startup.
pub struct Context {
    pub installer: WhiskyWineInstaller,
    pub registry: BottleRegistry,
}

fn bottle_json(bottle: &Bottle) -> Value {
    json!({
        "name": bottle.name(),
        "path": bottle.location(),
        "windowsVersion": bottle.settings().windows_version,
        "wineVersion": bottle.settings().wine_version,
        "available": bottle.is_available(),
        "inFlight": bottle.in_flight(),
    })
}

pub async fn install(context: &Context, archive: &Path) -> whisky_kit::Result<Value> {
    context.installer.install(archive).await?;
    Ok(json!({
        "success": true,
        "version": context.installer.local_version(),
    }))
}

pub fn uninstall(context: &Context) -> whisky_kit::Result<Value> {
    context.installer.uninstall()?;
    Ok(json!({ "success": true }))
}

pub fn status(context: &Context) -> Value {
    let layout = context.installer.layout();
    json!({
        "installed": context.installer.is_installed(),
        "version": context.installer.local_version(),
        "applicationFolder": layout.application_folder(),
        "binFolder": layout.bin_folder(),
    })
}

pub async fn check_update(context: Context, url: Option<&str>) -> whisky_kit::Result<Value> {
    let installer = match url {
        Some(url) => context.installer.with_version_url(url)?,
        None => context.installer,
    };
    let check = installer.check_for_update().await;
    Ok(serde_json::to_value(check)?)
}

pub async fn list(context: &Context) -> whisky_kit::Result<Value> {
    context.registry.load(false).await?;
    let bottles: Vec<Value> = context
        .registry
        .records()
        .await
        .iter()
        .map(|record| bottle_json(&read_bottle(record)))
        .collect();

    Ok(json!({
        "active": context.registry.count_active().await,
        "bottles": bottles,
    }))
}

pub async fn create(
    context: &Context,
    name: String,
    windows_version: WinVersion,
    parent: Option<PathBuf>,
) -> whisky_kit::Result<Value> {
    let parent = parent.unwrap_or_else(|| context.registry.config().bottles_folder.clone());
    context.registry.load(false).await?;

    let pending = context.registry.create_bottle(name, windows_version, &parent);
    info!("Waiting for bottle at {}", pending.location().display());
    let record = pending.wait().await?;

    let bottle = read_bottle(&record);
    Ok(bottle_json(&bottle))
}

pub async fn remove(context: &Context, path: &Path) -> whisky_kit::Result<Value> {
    context.registry.remove_bottle(path).await?;
    Ok(json!({ "success": true, "path": path }))
}
