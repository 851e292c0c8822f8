use crate::config::toml_config::EphemerisConfig;
use crate::domain::model::{BirthInput, BirthSubmission};
use crate::ephemeris::spk::SpkKernel;
use crate::utils::error::{FortuneError, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// 下載 kernel 用的 client，帶逾時設定
pub fn download_client(config: &EphemerisConfig, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(config.download_timeout_seconds))
        .build()?;
    Ok(client)
}

/// Validates the birth date first; only a valid submission may trigger a
/// kernel download.
pub async fn ensure_kernel_for(
    submission: &BirthSubmission,
    client: &Client,
    path: &Path,
    download_url: Option<&str>,
) -> Result<BirthInput> {
    let input = BirthInput::try_from(submission)?;
    ensure_kernel(client, path, download_url).await?;
    Ok(input)
}

/// Makes sure the SPK kernel exists at `path`, downloading it once when a URL
/// is configured. Returns `true` when a download happened.
pub async fn ensure_kernel(client: &Client, path: &Path, download_url: Option<&str>) -> Result<bool> {
    if tokio::fs::try_exists(path).await? {
        tracing::debug!("Ephemeris kernel present at {}", path.display());
        return Ok(false);
    }

    let Some(url) = download_url else {
        return Err(FortuneError::kernel(format!(
            "{} not found and no download URL configured",
            path.display()
        )));
    };

    tracing::info!("📥 Downloading ephemeris kernel from {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    // 內容不是 SPK 就不落地，下次還能重新下載
    let kernel = SpkKernel::from_bytes(bytes.to_vec()).map_err(|e| {
        FortuneError::kernel(format!("download from {} is not a usable kernel: {}", url, e))
    })?;
    tracing::debug!("Downloaded kernel has {} segments", kernel.segments().len());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let partial = path.with_extension("part");
    if let Err(e) = write_then_rename(&partial, path, &bytes).await {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            tracing::warn!("Could not remove {}: {}", partial.display(), cleanup);
        }
        return Err(e);
    }

    tracing::info!("✅ Saved {} bytes to {}", bytes.len(), path.display());
    Ok(true)
}

async fn write_then_rename(partial: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(partial, bytes).await?;
    tokio::fs::rename(partial, path).await?;
    Ok(())
}
