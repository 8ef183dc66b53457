// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! One-shot submission CLI: drives a single receipt file through the whole
//! pipeline against the real endpoints and reports the terminal state.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{debug, info, warn};
use rrp_client::{
    backend::BackendClient,
    context::HttpContext,
    extraction::{ExtractionClient, DEFAULT_EXTRACTION_URL},
    metrics,
};
use rrp_core::{
    manager::{Manager, PointsSchedule},
    session::{OpenGate, Session, SessionState},
    user::{Identity, UserAccount, UserId},
};
use rrp_receipt::{checks::default_checks, file::ReceiptFile, Context};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the receipt image or PDF to submit.
    #[arg(long, env = "RRP_FILE")]
    file: PathBuf,

    /// Declared media type of the file. Inferred from the file extension
    /// when omitted; a `.heic` file is accepted either way.
    #[arg(long, env = "RRP_MEDIA_TYPE")]
    media_type: Option<String>,

    /// User id as supplied by the host platform's identity.
    #[arg(long, env = "RRP_USER_ID")]
    user_id: String,

    /// Display name of the user, if the host supplies one.
    #[arg(long, env = "RRP_DISPLAY_NAME")]
    display_name: Option<String>,

    /// The user's current points total, used to compute the credited total.
    /// Defaults to 0.
    #[arg(long, default_value_t = 0, env = "RRP_CURRENT_POINTS")]
    current_points: u64,

    /// Extraction service endpoint.
    #[arg(long, default_value = DEFAULT_EXTRACTION_URL, env = "RRP_EXTRACTION_URL")]
    extraction_url: String,

    /// API key for the extraction service.
    #[arg(long, env = "RRP_EXTRACTION_API_KEY")]
    extraction_api_key: String,

    /// Base URL of the backend API hosting the receipt store and ledger
    /// endpoints.
    #[arg(long, env = "RRP_API_URL")]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger.
    // Set the log level by setting the RUST_LOG environment variable.
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    debug!("Settings: {:?}", args);

    let bytes = std::fs::read(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("receipt")
        .to_owned();
    let declared_type = args
        .media_type
        .clone()
        .or_else(|| media_type_for_extension(&args.file));
    let file = ReceiptFile::new(file_name, declared_type, bytes);
    info!(
        "submitting {} ({} bytes) for user {}",
        args.file.display(),
        file.size_bytes(),
        args.user_id
    );

    let context = HttpContext::new(
        ExtractionClient::new(&args.extraction_url, &args.extraction_api_key)?,
        BackendClient::new(&args.api_url)?,
    );
    let manager = Manager::new(context, default_checks(), PointsSchedule::default());
    let mut user = UserAccount::with_points(
        Identity {
            user_id: UserId::new(args.user_id),
            display_name: args.display_name,
            avatar_url: None,
        },
        args.current_points,
    );

    let session = Session::new();
    session.select_file(&manager, &Context::new(), file).await?;
    metrics::RECEIPTS_SUBMITTED.inc();
    // A CLI invocation has no wallet to wait for; the gate is always open.
    session.process(&manager, &OpenGate, &mut user).await?;

    let outcome = match session.state() {
        SessionState::Success {
            receipt_id,
            points_awarded,
        } => {
            metrics::RECEIPTS_CREDITED.inc();
            info!(
                "credited {points_awarded} points for receipt {receipt_id}, new total {}",
                user.points()
            );
            Ok(())
        }
        SessionState::Duplicate { receipt_id } => {
            metrics::RECEIPTS_DUPLICATE.inc();
            info!("receipt {receipt_id} was already submitted, nothing credited");
            Ok(())
        }
        SessionState::Rejected { reason } => {
            warn!("submission rejected: {reason}");
            Err(anyhow!("rejected: {reason}"))
        }
        SessionState::Failed { reason } => {
            metrics::TRANSPORT_FAILURES.inc();
            warn!("submission failed: {reason}");
            Err(anyhow!("failed (retryable): {reason}"))
        }
        state => Err(anyhow!("submission ended in unexpected state {state:?}")),
    };

    debug!(
        "counters: submitted={} credited={} duplicate={} extraction_failures={} transport_failures={}",
        metrics::RECEIPTS_SUBMITTED.get(),
        metrics::RECEIPTS_CREDITED.get(),
        metrics::RECEIPTS_DUPLICATE.get(),
        metrics::EXTRACTION_FAILURES.get(),
        metrics::TRANSPORT_FAILURES.get(),
    );

    outcome
}

fn media_type_for_extension(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    let media_type = match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(media_type.to_owned())
}

#[cfg(test)]
mod main_unit_test {
    use super::*;

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(
            media_type_for_extension(Path::new("scan.PDF")).as_deref(),
            Some("application/pdf")
        );
        assert_eq!(
            media_type_for_extension(Path::new("photo.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            media_type_for_extension(Path::new("photo.heic")).as_deref(),
            Some("image/heic")
        );
        assert_eq!(media_type_for_extension(Path::new("notes.txt")), None);
        assert_eq!(media_type_for_extension(Path::new("no_extension")), None);
    }
}
