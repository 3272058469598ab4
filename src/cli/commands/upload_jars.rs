//! Upload-product-jars command implementation.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::upload::{ArtifactoryClient, upload_product_jars};

/// Execute upload-product-jars command
pub(super) async fn execute_upload_jars(args: &Args, config: &RuntimeConfig) -> Result<()> {
    if let Command::UploadProductJars {
        tarball_path,
        mvn_repository,
        artifactory_url,
        artifactory_username,
        artifactory_password,
    } = &args.command
    {
        let client = ArtifactoryClient::new(
            artifactory_url,
            artifactory_username.as_str(),
            artifactory_password.as_str(),
            config.env().http_timeout(),
        )?;

        config.info_println(&format!(
            "Uploading Maven artifacts from {} to {}",
            tarball_path.display(),
            artifactory_url
        ));
        let report = upload_product_jars(tarball_path, mvn_repository, &client).await?;

        for artifact in &report.artifacts {
            config.indent(&format!("{} ({} bytes)", artifact.url, artifact.size));
        }
        config.success_println(&format!(
            "Uploaded {} artifact(s), {} bytes",
            report.artifacts.len(),
            report.total_bytes()
        ));
    } else {
        unreachable!("execute_upload_jars called with non-UploadProductJars command");
    }

    Ok(())
}
